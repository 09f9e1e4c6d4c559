//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to background
//! tasks.  The user profile (name, language, provider, API key) is *not*
//! stored here; see [`crate::profile::ProfileStore`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

/// Connection details for the two LLM providers.
///
/// The defaults are the public production endpoints; tests and self-hosted
/// proxies override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Full `generateContent` URL.  The API key is appended as `?key=`.
    pub gemini_url: String,
    /// Full OpenAI-style chat completions URL.
    pub groq_url: String,
    /// Model identifier sent in the Groq request body.
    pub groq_model: String,
    /// Sampling temperature sent to both providers.
    pub temperature: f32,
    /// Output token limit (`maxOutputTokens` / `max_tokens`).
    pub max_output_tokens: u32,
    /// Per-request timeout.  `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gemini_url:
                "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent"
                    .into(),
            groq_url: "https://api.groq.com/openai/v1/chat/completions".into(),
            groq_model: "openai/gpt-oss-20b".into(),
            temperature: 0.7,
            max_output_tokens: 1024,
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech recognition and synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// GGML Whisper model file stem under the models directory
    /// (e.g. `"base.en"` resolves to `models/ggml-base.en.bin`).
    pub stt_model: String,
    /// Recognition language passed to Whisper.
    pub language: String,
    /// RMS level above which a 30 ms frame counts as speech.
    pub vad_threshold: f32,
    /// Silence after speech that ends a capture, in milliseconds.
    pub trailing_silence_ms: u64,
    /// Hard upper bound on a single capture, in seconds.
    pub max_listen_secs: f32,
    /// Attempt GPU-accelerated inference when available.
    pub use_gpu: bool,
    /// Override for the text-to-speech command (`say`, `espeak-ng`, …).
    /// `None` picks the platform default.
    pub tts_command: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            stt_model: "base.en".into(),
            language: "en".into(),
            vad_threshold: 0.01,
            trailing_silence_ms: 1_200,
            max_listen_secs: 30.0,
            use_gpu: false,
            tts_command: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size in logical pixels.
    pub window_size: (f32, f32),
    /// Smallest size the window can be shrunk to.
    pub min_window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (1024.0, 720.0),
            min_window_size: (640.0, 480.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use english_tutor::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert_eq!(config.relay.max_output_tokens, 1024);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// LLM provider endpoints and generation parameters.
    pub relay: RelayConfig,
    /// Speech recognition / synthesis settings.
    pub speech: SpeechConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + profile store):
//!   Windows: %APPDATA%\english-tutor\
//!   macOS:   ~/Library/Application Support/english-tutor/
//!   Linux:   ~/.config/english-tutor/
//!
//! Data dir (Whisper models):
//!   Windows: %LOCALAPPDATA%\english-tutor\
//!   macOS:   ~/Library/Application Support/english-tutor/
//!   Linux:   ~/.local/share/english-tutor/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `store.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the local key-value store holding the profile.
    pub store_file: PathBuf,
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "english-tutor";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let store_file = config_dir.join("store.json");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            store_file,
            models_dir,
        }
    }

    /// Path of the GGML file for a model stem, e.g. `base.en` →
    /// `<models_dir>/ggml-base.en.bin`.
    pub fn model_file(&self, model: &str) -> PathBuf {
        self.models_dir.join(format!("ggml-{model}.bin"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

//! Provider-agnostic message relay.
//!
//! This module provides:
//! * [`Relay`]: async trait: `(message, profile, system prompt) → reply text`.
//! * [`GeminiRelay`] / [`GroqRelay`]: one implementation per provider wire
//!   format.
//! * [`MessageRelay`]: the single dispatch point that checks the API key and
//!   picks the provider named by the profile.
//! * [`RelayWorker`] / [`PendingReply`]: runs relay calls on the tokio
//!   runtime so the UI thread can poll for the result each frame.
//! * [`RelayError`]: configuration / network / malformed-response errors.
//!
//! The two providers build different request shapes: Gemini
//! receives one flat prompt string, Groq receives a system message plus a
//! verbatim user message.

pub mod gemini;
pub mod groq;
pub mod worker;

pub use gemini::GeminiRelay;
pub use groq::GroqRelay;
pub use worker::{PendingReply, RelayWorker};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::RelayConfig;
use crate::profile::{Profile, Provider};

// ---------------------------------------------------------------------------
// RelayError
// ---------------------------------------------------------------------------

/// Errors that can occur while relaying a message to a provider.
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// Missing API key or unsupported provider.  Raised before any network
    /// traffic; the user has to fix their settings.
    #[error("{0}")]
    Configuration(String),

    /// Transport failure or non-2xx status.  Carries the provider-reported
    /// message when one was present.
    #[error("{0}")]
    Network(String),

    /// A 2xx response whose body lacks the expected fields.
    #[error("Unexpected response from {provider} API: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },
}

impl RelayError {
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        RelayError::Network(e.without_url().to_string())
    }
}

// ---------------------------------------------------------------------------
// Relay trait
// ---------------------------------------------------------------------------

/// Async trait for sending one message to an LLM provider.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn Relay>`.
///
/// # Arguments
/// * `message`       – The user's text, sent once with no prior history.
/// * `profile`       – Supplies provider, API key and native language.
/// * `system_prompt` – Instructions for the model; may be empty.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn relay(
        &self,
        message: &str,
        profile: &Profile,
        system_prompt: &str,
    ) -> Result<String, RelayError>;
}

// ---------------------------------------------------------------------------
// MessageRelay
// ---------------------------------------------------------------------------

/// Dispatches to [`GeminiRelay`] or [`GroqRelay`] based on
/// `profile.ai_provider`.
///
/// The reply is returned exactly as the provider produced it; callers trim
/// when they need to.  Every call makes at most one HTTP request and never
/// retries.
pub struct MessageRelay {
    gemini: GeminiRelay,
    groq: GroqRelay,
}

impl MessageRelay {
    /// Build both provider clients from application config.
    pub fn from_config(config: &RelayConfig) -> Self {
        let client = build_client(config);
        Self {
            gemini: GeminiRelay::new(client.clone(), config.clone()),
            groq: GroqRelay::new(client, config.clone()),
        }
    }
}

#[async_trait]
impl Relay for MessageRelay {
    async fn relay(
        &self,
        message: &str,
        profile: &Profile,
        system_prompt: &str,
    ) -> Result<String, RelayError> {
        if profile.api_key.is_empty() {
            return Err(RelayError::Configuration(
                "API key not configured".into(),
            ));
        }

        let result = match profile.ai_provider {
            Provider::Gemini => self.gemini.relay(message, profile, system_prompt).await,
            Provider::Groq => self.groq.relay(message, profile, system_prompt).await,
            Provider::Unknown => Err(RelayError::Configuration("Invalid AI provider".into())),
        };

        if let Err(e) = &result {
            log::error!(
                "Relay via {} failed: {e}",
                profile.ai_provider.as_str()
            );
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// HTTP client shared by both providers.  A timeout is applied only when one
/// is configured.
fn build_client(config: &RelayConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("HTTP client builder failed ({e}); using defaults");
        reqwest::Client::new()
    })
}

/// Suffix both providers append to a non-empty system prompt.
pub(crate) fn native_language_note(system_prompt: &str, native_language: &str) -> String {
    format!("{system_prompt}\n\nUser's native language: {native_language}")
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Message from a `{ "error": { "message": … } }` body, or `fallback`.
pub(crate) fn provider_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|d| d.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

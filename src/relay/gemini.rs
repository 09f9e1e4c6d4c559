//! Gemini `generateContent` relay.
//!
//! Gemini is driven as a single-shot prompt: the system prompt, the user's
//! native language and the message are folded into one text part.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{native_language_note, provider_error_message, Relay, RelayError};
use crate::config::RelayConfig;
use crate::profile::Profile;

const PROVIDER: &str = "Gemini";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Prompt / body construction
// ---------------------------------------------------------------------------

/// Fold the system prompt into a single prompt string.
///
/// With an empty `system_prompt` the message is sent unchanged.
pub fn compose_prompt(message: &str, native_language: &str, system_prompt: &str) -> String {
    if system_prompt.is_empty() {
        message.to_string()
    } else {
        format!(
            "{}\n\nUser: {message}",
            native_language_note(system_prompt, native_language)
        )
    }
}

pub fn request_body(prompt: String, config: &RelayConfig) -> GeminiRequest {
    GeminiRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a success body.
fn extract_reply(body: &str) -> Result<String, RelayError> {
    let malformed = |detail: &str| RelayError::MalformedResponse {
        provider: PROVIDER,
        detail: detail.to_string(),
    };

    let parsed: GeminiResponse =
        serde_json::from_str(body).map_err(|e| malformed(&e.to_string()))?;

    let candidate = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| malformed("no candidates"))?;

    candidate
        .content
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| malformed("candidate has no text part"))
}

// ---------------------------------------------------------------------------
// GeminiRelay
// ---------------------------------------------------------------------------

pub struct GeminiRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl GeminiRelay {
    pub fn new(client: reqwest::Client, config: RelayConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Relay for GeminiRelay {
    /// POST to `<gemini_url>?key=<apiKey>`.  The key travels in the query
    /// string, so transport errors are reported without the URL.
    async fn relay(
        &self,
        message: &str,
        profile: &Profile,
        system_prompt: &str,
    ) -> Result<String, RelayError> {
        let prompt = compose_prompt(message, &profile.native_language, system_prompt);
        log::debug!(
            "Gemini request: prompt {} chars (system prompt {} chars)",
            prompt.len(),
            system_prompt.len()
        );
        let body = request_body(prompt, &self.config);

        let response = self
            .client
            .post(&self.config.gemini_url)
            .query(&[("key", profile.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(RelayError::transport)?;

        let status = response.status();
        let text = response.text().await.map_err(RelayError::transport)?;

        if !status.is_success() {
            log::debug!("Gemini returned HTTP {status}");
            return Err(RelayError::Network(provider_error_message(
                &text,
                "Gemini API error",
            )));
        }

        extract_reply(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Groq chat-completions relay (OpenAI wire format).
//!
//! Groq receives a structured exchange: an optional system message carrying
//! the prompt and native language, then the user's message verbatim.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{native_language_note, provider_error_message, Relay, RelayError};
use crate::config::RelayConfig;
use crate::profile::Profile;

const PROVIDER: &str = "Groq";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Message / body construction
// ---------------------------------------------------------------------------

/// Build the message list: `[system?, user]`.
///
/// The system prompt is never concatenated into the user message.
pub fn compose_messages(
    message: &str,
    native_language: &str,
    system_prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: native_language_note(system_prompt, native_language),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: message.to_string(),
    });
    messages
}

pub fn request_body(messages: Vec<ChatMessage>, config: &RelayConfig) -> ChatRequest {
    ChatRequest {
        model: config.groq_model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: config.max_output_tokens,
    }
}

/// Pull `choices[0].message.content` out of a success body.
fn extract_reply(body: &str) -> Result<String, RelayError> {
    let malformed = |detail: &str| RelayError::MalformedResponse {
        provider: PROVIDER,
        detail: detail.to_string(),
    };

    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| malformed(&e.to_string()))?;

    parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| malformed("no choices"))?
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| malformed("choice has no message content"))
}

// ---------------------------------------------------------------------------
// GroqRelay
// ---------------------------------------------------------------------------

pub struct GroqRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl GroqRelay {
    pub fn new(client: reqwest::Client, config: RelayConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Relay for GroqRelay {
    async fn relay(
        &self,
        message: &str,
        profile: &Profile,
        system_prompt: &str,
    ) -> Result<String, RelayError> {
        let messages = compose_messages(message, &profile.native_language, system_prompt);
        log::debug!(
            "Groq request: {} message(s), model {}",
            messages.len(),
            self.config.groq_model
        );
        let body = request_body(messages, &self.config);

        let response = self
            .client
            .post(&self.config.groq_url)
            .bearer_auth(&profile.api_key)
            .json(&body)
            .send()
            .await
            .map_err(RelayError::transport)?;

        let status = response.status();
        let text = response.text().await.map_err(RelayError::transport)?;

        if !status.is_success() {
            log::debug!("Groq returned HTTP {status}");
            return Err(RelayError::Network(provider_error_message(
                &text,
                "Groq API error",
            )));
        }

        extract_reply(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

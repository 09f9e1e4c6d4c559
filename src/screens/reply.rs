//! Reply generator: context + tone + platform in, a ready-to-send reply out.

use std::time::{Duration, Instant};

use crate::profile::Profile;
use crate::prompt::{reply_request, Platform, Tone};
use crate::relay::{PendingReply, RelayWorker};

pub const MISSING_FIELDS: &str =
    "Please provide conversation context, select a tone, and choose a platform";

/// Context length (in characters, trimmed) after which the tone and
/// platform pickers appear.
const OPTIONS_THRESHOLD: usize = 10;

const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Default)]
pub struct ReplyGenerator {
    context: String,
    pub tone: Option<Tone>,
    pub platform: Option<Platform>,
    reply: Option<String>,
    pending: Option<PendingReply>,
    error: Option<String>,
    show_options: bool,
    copied_at: Option<Instant>,
}

impl ReplyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Update the context text.  Once it grows past the threshold the
    /// options stay visible.
    pub fn set_context(&mut self, text: impl Into<String>) {
        self.context = text.into();
        if self.context.trim().chars().count() > OPTIONS_THRESHOLD {
            self.show_options = true;
        }
    }

    pub fn use_example(&mut self, example: &str) {
        self.context = example.to_string();
        self.show_options = true;
    }

    pub fn show_options(&self) -> bool {
        self.show_options
    }

    pub fn reply(&self) -> Option<&str> {
        self.reply.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generate(&mut self, relay: &RelayWorker, profile: &Profile) {
        if self.pending.is_some() {
            return;
        }
        let (Some(tone), Some(platform)) = (self.tone, self.platform) else {
            self.error = Some(MISSING_FIELDS.into());
            return;
        };
        if self.context.trim().is_empty() {
            self.error = Some(MISSING_FIELDS.into());
            return;
        }

        self.error = None;
        self.reply = None;
        let request = reply_request(&self.context, tone, platform);
        self.pending = Some(relay.submit(request, profile.clone(), String::new()));
    }

    pub fn update(&mut self) {
        let Some(result) = self.pending.as_mut().and_then(PendingReply::poll) else {
            return;
        };
        self.pending = None;
        match result {
            Ok(text) if text.trim().is_empty() => {
                self.error = Some("Received empty response from AI".into());
            }
            Ok(text) => self.reply = Some(text.trim().to_string()),
            Err(e) => {
                log::warn!("Reply generation failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Record that the reply was copied, for the "Copied!" label.
    pub fn mark_copied(&mut self) {
        self.copied_at = Some(Instant::now());
    }

    pub fn recently_copied(&self) -> bool {
        self.copied_at
            .is_some_and(|t| t.elapsed() < COPIED_FEEDBACK)
    }

    /// "Start over": clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

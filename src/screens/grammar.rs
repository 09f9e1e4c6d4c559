//! One-sentence grammar correction with a session history.

use chrono::{DateTime, Local};

use crate::profile::Profile;
use crate::prompt::{clean_correction, GRAMMAR};
use crate::relay::{PendingReply, RelayWorker};

pub const EXAMPLE_SENTENCES: [&str; 5] = [
    "I goes to school everyday",
    "She don't like coffee",
    "They was playing football yesterday",
    "He have three cats at home",
    "We was very happy last night",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Default)]
pub struct GrammarCheck {
    pub input: String,
    corrections: Vec<Correction>,
    pending: Option<(String, PendingReply)>,
    error: Option<String>,
}

impl GrammarCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent first.
    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn use_example(&mut self, sentence: &str) {
        self.input = sentence.to_string();
    }

    pub fn submit(&mut self, relay: &RelayWorker, profile: &Profile) {
        if self.input.trim().is_empty() || self.pending.is_some() {
            return;
        }
        self.error = None;
        let original = self.input.clone();
        let reply = relay.submit(original.clone(), profile.clone(), GRAMMAR.to_string());
        self.pending = Some((original, reply));
    }

    pub fn update(&mut self) {
        let Some((_, reply)) = self.pending.as_mut() else {
            return;
        };
        let Some(result) = reply.poll() else {
            return;
        };
        let Some((original, _)) = self.pending.take() else {
            return;
        };

        match result {
            Ok(response) if response.trim().is_empty() => {
                self.error = Some("Received empty response from AI".into());
            }
            Ok(response) => {
                self.corrections.insert(
                    0,
                    Correction {
                        original,
                        corrected: clean_correction(&response),
                        timestamp: Local::now(),
                    },
                );
                self.input.clear();
            }
            Err(e) => {
                log::warn!("Grammar check failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn clear_history(&mut self) {
        self.corrections.clear();
    }
}

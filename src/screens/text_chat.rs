//! Free-form typed conversation with the tutor.

use super::ChatSession;
use crate::profile::Profile;
use crate::prompt::GENERAL;
use crate::relay::RelayWorker;

pub const QUICK_PROMPTS: [&str; 5] = [
    "Let's practice introducing ourselves",
    "Can we talk about daily routines?",
    "I want to improve my vocabulary",
    "Help me with business English",
    "Let's discuss current events",
];

pub struct TextChat {
    pub input: String,
    pub session: ChatSession,
}

impl Default for TextChat {
    fn default() -> Self {
        Self::new()
    }
}

impl TextChat {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            session: ChatSession::new(GENERAL),
        }
    }

    /// Fill the input with a suggestion; the user still has to send it.
    pub fn use_quick_prompt(&mut self, prompt: &str) {
        self.input = prompt.to_string();
    }

    pub fn submit(&mut self, relay: &RelayWorker, profile: &Profile) {
        if self.session.send(&self.input, relay, profile) {
            self.input.clear();
        }
    }

    pub fn update(&mut self) {
        self.session.poll();
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{settle, Harness};
    use crate::screens::Message;

    #[test]
    fn quick_prompt_fills_input_without_sending() {
        let h = Harness::new();
        let mut chat = TextChat::new();
        chat.use_quick_prompt(QUICK_PROMPTS[1]);
        assert_eq!(chat.input, "Can we talk about daily routines?");
        assert!(h.calls().is_empty());
    }

    #[test]
    fn submit_sends_with_general_prompt_and_clears_input() {
        let h = Harness::new();
        let mut chat = TextChat::new();
        chat.input = "How are you?".into();
        chat.submit(&h.worker, &h.profile);
        assert!(chat.input.is_empty());

        settle(|| {
            chat.update();
            !chat.session.is_processing()
        });
        assert_eq!(chat.session.messages()[1], Message::assistant("echo: How are you?"));
        assert_eq!(h.calls()[0].1, GENERAL);
    }

    #[test]
    fn blank_input_is_ignored() {
        let h = Harness::new();
        let mut chat = TextChat::new();
        chat.input = "  \n".into();
        chat.submit(&h.worker, &h.profile);
        assert!(chat.session.messages().is_empty());
        assert_eq!(chat.input, "  \n");
    }

    #[test]
    fn clear_empties_transcript() {
        let h = Harness::new();
        let mut chat = TextChat::new();
        chat.input = "Hi".into();
        chat.submit(&h.worker, &h.profile);
        chat.clear();
        assert!(chat.session.messages().is_empty());
        assert!(!chat.session.is_processing());
    }
}

//! Scenario role-play: pick a scenario, pick voice or text, then chat.

use super::{classify_event, ChatSession, SpeechChannel, VoiceOutcome, UNSUPPORTED_RECOGNITION};
use crate::profile::Profile;
use crate::prompt::{self, Scenario};
use crate::relay::RelayWorker;
use crate::speech::SpeechAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationMode {
    Voice,
    Text,
}

/// Where the user is in the picker flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ChooseScenario,
    ChooseMode(&'static Scenario),
    Chat(&'static Scenario, ConversationMode),
}

pub struct Conversations {
    stage: Stage,
    pub input: String,
    pub session: ChatSession,
    channel: SpeechChannel,
    listening: bool,
    speaking: bool,
}

impl Default for Conversations {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversations {
    pub fn new() -> Self {
        Self {
            stage: Stage::ChooseScenario,
            input: String::new(),
            session: ChatSession::new(String::new()),
            channel: SpeechChannel::default(),
            listening: false,
            speaking: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn scenarios(&self) -> &'static [Scenario] {
        prompt::SCENARIOS
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn select_scenario(&mut self, scenario: &'static Scenario) {
        self.stage = Stage::ChooseMode(scenario);
    }

    /// From the mode picker back to the scenario list.
    pub fn back(&mut self) {
        self.stage = Stage::ChooseScenario;
    }

    /// Open the chat with a random scenario question from the tutor.  In
    /// voice mode the question is also spoken.
    pub fn start(&mut self, mode: ConversationMode, speech: &mut SpeechAdapter) {
        let Stage::ChooseMode(scenario) = self.stage else {
            return;
        };
        self.stage = Stage::Chat(scenario, mode);
        self.session = ChatSession::new(prompt::conversation(scenario.title));

        let opener = prompt::random_opening_question(scenario.title);
        self.session.push_assistant(opener.clone());
        if mode == ConversationMode::Voice {
            self.channel.speak(speech, &opener);
            self.speaking = speech.is_speaking();
        }
    }

    pub fn submit_text(&mut self, relay: &RelayWorker, profile: &Profile) {
        if self.session.send(&self.input, relay, profile) {
            self.input.clear();
        }
    }

    pub fn start_voice_input(&mut self, speech: &mut SpeechAdapter) {
        if !speech.is_recognition_supported() {
            self.session.set_error(UNSUPPORTED_RECOGNITION);
            return;
        }
        self.session.clear_error();
        self.listening = true;
        self.channel.listen(speech);
    }

    pub fn stop_listening(&mut self, speech: &mut SpeechAdapter) {
        speech.stop_listening();
        self.listening = false;
    }

    pub fn stop_speaking(&mut self, speech: &mut SpeechAdapter) {
        speech.stop_speaking();
        self.speaking = false;
    }

    pub fn update(&mut self, speech: &mut SpeechAdapter, relay: &RelayWorker, profile: &Profile) {
        for event in self.channel.drain() {
            match classify_event(event) {
                VoiceOutcome::Transcript(text) => {
                    self.listening = false;
                    self.session.send(&text, relay, profile);
                }
                VoiceOutcome::Error(message) => {
                    self.listening = false;
                    self.session.set_error(message);
                }
                VoiceOutcome::Ignored => self.listening = false,
                VoiceOutcome::SpeakingDone => self.speaking = false,
            }
        }

        if let Some(reply) = self.session.poll() {
            if matches!(self.stage, Stage::Chat(_, ConversationMode::Voice)) {
                self.channel.speak(speech, &reply);
            }
        }
        // Playback that failed or never started sends no finish event.
        self.speaking = speech.is_speaking();
    }

    /// "New scenario": back to the scenario list with everything cleared.
    pub fn reset(&mut self, speech: &mut SpeechAdapter) {
        if self.listening {
            self.stop_listening(speech);
        }
        self.stop_speaking(speech);
        self.stage = Stage::ChooseScenario;
        self.input.clear();
        self.session = ChatSession::new(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{settle, Harness};
    use crate::screens::Role;
    use crate::speech::adapter::fakes::{adapter, FakeRecognizer, FakeSynthesizer};

    fn office() -> &'static Scenario {
        &prompt::SCENARIOS[0]
    }

    #[test]
    fn picker_flow_reaches_chat_with_opening_question() {
        let synth = FakeSynthesizer::new(true, vec![]);
        let mut speech = adapter(&FakeRecognizer::new(true), &synth);
        let mut screen = Conversations::new();

        screen.start(ConversationMode::Text, &mut speech);
        assert_eq!(screen.stage(), Stage::ChooseScenario);

        screen.select_scenario(office());
        screen.back();
        assert_eq!(screen.stage(), Stage::ChooseScenario);

        screen.select_scenario(office());
        screen.start(ConversationMode::Text, &mut speech);
        assert_eq!(screen.stage(), Stage::Chat(office(), ConversationMode::Text));

        let messages = screen.session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert!(office().opening_questions.contains(&messages[0].content.as_str()));
        assert!(synth.spoken_texts().is_empty());
    }

    #[test]
    fn voice_mode_speaks_opener_and_replies() {
        let h = Harness::new();
        let rec = FakeRecognizer::new(true);
        let synth = FakeSynthesizer::new(true, vec![]);
        let mut speech = adapter(&rec, &synth);
        let mut screen = Conversations::new();
        screen.select_scenario(office());
        screen.start(ConversationMode::Voice, &mut speech);
        assert_eq!(synth.spoken_texts().len(), 1);

        screen.start_voice_input(&mut speech);
        rec.finish(Ok("I work in sales".into()));
        settle(|| {
            screen.update(&mut speech, &h.worker, &h.profile);
            screen.session.messages().len() == 3
        });

        assert_eq!(synth.spoken_texts()[1], "echo: I work in sales");
        assert_eq!(h.calls()[0].1, prompt::conversation("Office"));
    }

    #[test]
    fn voice_mode_without_synthesis_is_not_stuck_speaking() {
        let synth = FakeSynthesizer::new(false, vec![]);
        let mut speech = adapter(&FakeRecognizer::new(true), &synth);
        let mut screen = Conversations::new();
        screen.select_scenario(office());
        screen.start(ConversationMode::Voice, &mut speech);

        assert_eq!(screen.session.messages().len(), 1);
        assert!(!screen.is_speaking());
    }

    #[test]
    fn text_mode_does_not_speak_replies() {
        let h = Harness::new();
        let synth = FakeSynthesizer::new(true, vec![]);
        let mut speech = adapter(&FakeRecognizer::new(true), &synth);
        let mut screen = Conversations::new();
        screen.select_scenario(&prompt::SCENARIOS[5]);
        screen.start(ConversationMode::Text, &mut speech);

        screen.input = "How much are the apples?".into();
        screen.submit_text(&h.worker, &h.profile);
        assert!(screen.input.is_empty());
        settle(|| {
            screen.update(&mut speech, &h.worker, &h.profile);
            !screen.session.is_processing()
        });
        assert_eq!(screen.session.messages().len(), 3);
        assert!(synth.spoken_texts().is_empty());
    }

    #[test]
    fn reset_returns_to_scenario_list() {
        let synth = FakeSynthesizer::new(true, vec![]);
        let mut speech = adapter(&FakeRecognizer::new(true), &synth);
        let mut screen = Conversations::new();
        screen.select_scenario(office());
        screen.start(ConversationMode::Voice, &mut speech);
        screen.reset(&mut speech);

        assert_eq!(screen.stage(), Stage::ChooseScenario);
        assert!(screen.session.messages().is_empty());
        assert!(!screen.is_speaking());
        assert!(!speech.is_speaking());
    }
}

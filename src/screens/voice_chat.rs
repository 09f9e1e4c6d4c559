//! Spoken conversation: listen, relay, speak the reply.

use super::{classify_event, ChatSession, SpeechChannel, VoiceOutcome, UNSUPPORTED_RECOGNITION};
use crate::profile::Profile;
use crate::prompt::GENERAL;
use crate::relay::RelayWorker;
use crate::speech::SpeechAdapter;

pub struct VoiceChat {
    pub session: ChatSession,
    channel: SpeechChannel,
    listening: bool,
    speaking: bool,
}

impl Default for VoiceChat {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceChat {
    pub fn new() -> Self {
        Self {
            session: ChatSession::new(GENERAL),
            channel: SpeechChannel::default(),
            listening: false,
            speaking: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn start_listening(&mut self, speech: &mut SpeechAdapter) {
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

    /// Drain speech events and the pending reply.  A transcript is relayed;
    /// a reply is shown and spoken.
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
            self.channel.speak(speech, &reply);
        }
        // Playback that failed or never started sends no finish event.
        self.speaking = speech.is_speaking();
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }
}

//! Screen controllers.
//!
//! Each screen owns its transient state (messages, inputs, the pending
//! relay call) and knows nothing about egui; [`crate::ui`] draws them.
//! A controller is rebuilt whenever its route is entered, so leaving a
//! screen discards its state.
//!
//! Shared pieces live here: the chat transcript ([`ChatSession`]), the
//! speech event bridge ([`SpeechChannel`]) and the profile form used by
//! onboarding and settings ([`ProfileForm`]).

pub mod conversations;
pub mod dashboard;
pub mod grammar;
pub mod onboarding;
pub mod reply;
pub mod settings;
pub mod text_chat;
pub mod voice_chat;

use std::sync::mpsc::{self, Receiver, Sender};

pub use conversations::{ConversationMode, Conversations};
pub use dashboard::Dashboard;
pub use grammar::{Correction, GrammarCheck};
pub use onboarding::{Onboarding, OnboardingStep};
pub use reply::ReplyGenerator;
pub use settings::Settings;
pub use text_chat::TextChat;
pub use voice_chat::VoiceChat;

use crate::profile::{Profile, Provider};
use crate::relay::{PendingReply, RelayWorker};
use crate::speech::{RecognitionError, SpeechAdapter};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

/// An append-only transcript with at most one relay call in flight.
///
/// Every message is sent on its own with the session's system prompt; the
/// transcript is never replayed to the provider.
pub struct ChatSession {
    system_prompt: String,
    messages: Vec<Message>,
    pending: Option<PendingReply>,
    error: Option<String>,
}

impl ChatSession {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            pending: None,
            error: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Seed the transcript with an assistant message (scenario openers).
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Append `text` as a user message and relay it.
    ///
    /// Refused (returns `false`) for blank input or while a reply is
    /// pending.
    pub fn send(&mut self, text: &str, relay: &RelayWorker, profile: &Profile) -> bool {
        if text.trim().is_empty() || self.pending.is_some() {
            return false;
        }
        self.messages.push(Message::user(text));
        self.error = None;
        self.pending = Some(relay.submit(
            text.to_string(),
            profile.clone(),
            self.system_prompt.clone(),
        ));
        true
    }

    /// Check the pending call.  Returns the assistant reply when one was
    /// appended this frame.
    pub fn poll(&mut self) -> Option<String> {
        let result = self.pending.as_mut()?.poll()?;
        self.pending = None;
        match result {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.clone()));
                Some(reply)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Drop the transcript and any error.  A reply still in flight is
    /// discarded.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending = None;
        self.error = None;
    }
}

// ---------------------------------------------------------------------------
// Speech bridge
// ---------------------------------------------------------------------------

/// Speech callbacks forwarded to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Transcript(String),
    Failed(RecognitionError),
    FinishedSpeaking,
}

/// Channel that turns adapter callbacks (fired on backend threads) into
/// events the screen drains each frame.
pub struct SpeechChannel {
    tx: Sender<SpeechEvent>,
    rx: Receiver<SpeechEvent>,
}

impl Default for SpeechChannel {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl SpeechChannel {
    pub fn listen(&self, speech: &mut SpeechAdapter) {
        let on_result = self.tx.clone();
        let on_error = self.tx.clone();
        speech.start_listening(
            move |transcript| {
                let _ = on_result.send(SpeechEvent::Transcript(transcript));
            },
            move |e| {
                let _ = on_error.send(SpeechEvent::Failed(e));
            },
        );
    }

    pub fn speak(&self, speech: &mut SpeechAdapter, text: &str) {
        let tx = self.tx.clone();
        speech.speak(
            text,
            Some(Box::new(move || {
                let _ = tx.send(SpeechEvent::FinishedSpeaking);
            })),
        );
    }

    pub fn drain(&self) -> Vec<SpeechEvent> {
        self.rx.try_iter().collect()
    }
}

/// User-facing text for a recognition failure.
pub fn speech_error_message(error: &RecognitionError) -> String {
    match error {
        RecognitionError::NoSpeech => {
            "No speech detected. Please speak clearly into your microphone and try again.".into()
        }
        RecognitionError::AudioCapture => {
            "Microphone not detected. Please check your microphone permissions.".into()
        }
        RecognitionError::NotAllowed => {
            "Microphone access denied. Please allow microphone permissions.".into()
        }
        RecognitionError::NotSupported => UNSUPPORTED_RECOGNITION.into(),
        other => format!("Speech recognition error: {}. Please try again.", other.code()),
    }
}

pub const UNSUPPORTED_RECOGNITION: &str =
    "Speech recognition is not supported on this system. Please install a Whisper model to use voice input.";

/// What a voice-capable screen should do with one drained event.
pub(crate) enum VoiceOutcome {
    Transcript(String),
    Error(String),
    Ignored,
    SpeakingDone,
}

pub(crate) fn classify_event(event: SpeechEvent) -> VoiceOutcome {
    match event {
        SpeechEvent::Transcript(t) => VoiceOutcome::Transcript(t),
        // Raised by our own stop_listening.
        SpeechEvent::Failed(e) if e == RecognitionError::aborted() => VoiceOutcome::Ignored,
        SpeechEvent::Failed(e) => VoiceOutcome::Error(speech_error_message(&e)),
        SpeechEvent::FinishedSpeaking => VoiceOutcome::SpeakingDone,
    }
}

// ---------------------------------------------------------------------------
// ProfileForm
// ---------------------------------------------------------------------------

/// Editable copy of the profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub native_language: String,
    pub provider: Option<Provider>,
    pub api_key: String,
}

impl ProfileForm {
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        match profile {
            Some(p) => Self {
                name: p.name.clone(),
                native_language: p.native_language.clone(),
                provider: Some(p.ai_provider),
                api_key: p.api_key.clone(),
            },
            None => Self::default(),
        }
    }

    pub fn personal_info_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.native_language.trim().is_empty()
    }

    pub fn ai_setup_complete(&self) -> bool {
        self.provider.is_some_and(|p| p != Provider::Unknown) && !self.api_key.trim().is_empty()
    }

    /// A full profile, or `None` while any field is missing.
    pub fn to_profile(&self) -> Option<Profile> {
        if !self.personal_info_complete() || !self.ai_setup_complete() {
            return None;
        }
        Some(Profile {
            name: self.name.clone(),
            native_language: self.native_language.clone(),
            ai_provider: self.provider?,
            api_key: self.api_key.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::profile::{Profile, Provider};
    use crate::relay::{Relay, RelayError, RelayWorker};

    /// Records every call and answers from a queue (default: echo).
    #[derive(Default)]
    pub struct ScriptedRelay {
        pub calls: Mutex<Vec<(String, String)>>,
        pub replies: Mutex<Vec<Result<String, RelayError>>>,
    }

    #[async_trait]
    impl Relay for ScriptedRelay {
        async fn relay(
            &self,
            message: &str,
            _profile: &Profile,
            system_prompt: &str,
        ) -> Result<String, RelayError> {
            self.calls
                .lock()
                .unwrap()
                .push((message.to_string(), system_prompt.to_string()));
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok(format!("echo: {message}"))
            } else {
                replies.remove(0)
            }
        }
    }

    pub struct Harness {
        pub runtime: tokio::runtime::Runtime,
        pub relay: Arc<ScriptedRelay>,
        pub worker: RelayWorker,
        pub profile: Profile,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_replies(Vec::new())
        }

        pub fn with_replies(replies: Vec<Result<String, RelayError>>) -> Self {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            let relay = Arc::new(ScriptedRelay {
                calls: Mutex::default(),
                replies: Mutex::new(replies),
            });
            let worker = RelayWorker::new(relay.clone(), runtime.handle().clone());
            Self {
                runtime,
                relay,
                worker,
                profile: Profile {
                    name: "Asha".into(),
                    native_language: "Tamil".into(),
                    ai_provider: Provider::Gemini,
                    api_key: "key".into(),
                },
            }
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.relay.calls.lock().unwrap().clone()
        }
    }

    /// Call `step` until it reports done or two seconds pass.
    pub fn settle(mut step: impl FnMut() -> bool) {
        for _ in 0..400 {
            if step() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("screen did not settle");
    }
}

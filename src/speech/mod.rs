//! Speech input and output for the tutor screens.
//!
//! [`SpeechAdapter`] is what screens talk to.  It sits over two backend
//! seams, [`SpeechRecognizer`] and [`SpeechSynthesizer`], and reports
//! recognition failures as short error codes (`no-speech`,
//! `audio-capture`, …) that the screens map to user-facing text.

pub mod adapter;
pub mod recognizer;
pub mod synthesizer;
pub mod voice;

use thiserror::Error;

pub use adapter::SpeechAdapter;
pub use recognizer::{
    ErrorCallback, MicrophoneRecognizer, RecognitionSink, ResultCallback, SpeechRecognizer,
};
pub use synthesizer::{
    CommandSynthesizer, DoneCallback, EndCallback, SpeechSynthesizer, TtsBackend,
};
pub use voice::{pick_voice, UtteranceSettings, Voice};

/// Why a recognition attempt produced no transcript.
///
/// `Display` is the error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("not-supported")]
    NotSupported,

    #[error("no-speech")]
    NoSpeech,

    #[error("audio-capture")]
    AudioCapture,

    #[error("not-allowed")]
    NotAllowed,

    #[error("failed-to-start")]
    FailedToStart,

    #[error("{0}")]
    Other(String),
}

impl RecognitionError {
    /// Reported when listening is stopped before a result arrives.
    pub fn aborted() -> Self {
        RecognitionError::Other("aborted".into())
    }

    pub fn code(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("speech synthesis is not available")]
    Unavailable,

    #[error("failed to start speech command: {0}")]
    Spawn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(RecognitionError::NoSpeech.code(), "no-speech");
        assert_eq!(RecognitionError::AudioCapture.code(), "audio-capture");
        assert_eq!(RecognitionError::NotAllowed.code(), "not-allowed");
        assert_eq!(RecognitionError::NotSupported.code(), "not-supported");
        assert_eq!(RecognitionError::aborted().code(), "aborted");
        assert_eq!(RecognitionError::Other("network".into()).code(), "network");
    }
}

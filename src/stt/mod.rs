//! Local speech-to-text with Whisper.
//!
//! The model file is `ggml-<stt_model>.bin` in the models directory (see
//! [`crate::config::AppPaths::model_file`]).  When it is missing the
//! recognizer reports speech recognition as unsupported.

pub mod engine;
pub mod transcribe;

pub use engine::{pad_to_minimum, SttEngine, SttError, WhisperEngine, MIN_AUDIO_SAMPLES};
pub use transcribe::TranscribeParams;

#[cfg(test)]
pub use engine::MockSttEngine;

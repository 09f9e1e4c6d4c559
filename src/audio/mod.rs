//! Microphone input for speech recognition.
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → prepare_chunk (16 kHz mono)
//!           → Endpointer → trimmed utterance → Whisper
//! ```

pub mod capture;
pub mod resample;
pub mod vad;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use resample::{downmix, prepare_chunk, resample_to_16k, TARGET_RATE};
pub use vad::{EndpointState, Endpointer, VadDetector};

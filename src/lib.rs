//! English tutor: a desktop app for practising English with an LLM.
//!
//! The user's profile (name, native language, provider, API key) is kept
//! in a local store.  Typed or spoken input is relayed to Gemini or Groq
//! with a prompt for the active practice mode, and replies are shown and
//! optionally read aloud.

pub mod app;
pub mod audio;
pub mod config;
pub mod format;
pub mod profile;
pub mod prompt;
pub mod relay;
pub mod router;
pub mod screens;
pub mod speech;
pub mod stt;
pub mod ui;

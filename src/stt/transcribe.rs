//! Parameters for a Whisper run.

/// Settings for one transcription.
///
/// ```
/// use english_tutor::stt::TranscribeParams;
///
/// let params = TranscribeParams::default();
/// assert_eq!(params.language, "en");
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 code handed to Whisper.  `"auto"` enables detection.
    pub language: String,
    /// CPU threads for inference, capped at 8.
    pub n_threads: i32,
    /// Ask whisper.cpp for a GPU backend when one is compiled in.
    pub use_gpu: bool,
    /// Keep Whisper's progress output off stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "en".into(),
            n_threads: optimal_threads(),
            use_gpu: false,
            suppress_progress: true,
        }
    }
}

impl TranscribeParams {
    /// Parameters from the `[speech]` config section.
    pub fn from_config(config: &crate::config::SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            use_gpu: config.use_gpu,
            ..Self::default()
        }
    }

    /// Language option for whisper-rs; `None` means auto-detect.
    pub fn whisper_language(&self) -> Option<&str> {
        match self.language.as_str() {
            "" | "auto" => None,
            code => Some(code),
        }
    }
}

pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

//! Speech recognition: one utterance from the microphone to text.
//!
//! [`SpeechRecognizer`] is the backend seam.  [`MicrophoneRecognizer`]
//! captures with cpal, stops at the end of the utterance and transcribes
//! with Whisper on a dedicated thread.  Results are delivered through a
//! [`RecognitionSink`], which guarantees exactly one callback per capture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use regex::Regex;

use super::RecognitionError;
use crate::audio::{prepare_chunk, AudioCapture, CaptureError, EndpointState, Endpointer};
use crate::config::{AppPaths, SpeechConfig};
use crate::stt::{pad_to_minimum, SttEngine, SttError, TranscribeParams, WhisperEngine};

// ---------------------------------------------------------------------------
// RecognitionSink
// ---------------------------------------------------------------------------

pub type ResultCallback = Box<dyn FnOnce(String) + Send>;
pub type ErrorCallback = Box<dyn FnOnce(RecognitionError) + Send>;

/// One-shot completion handle for a capture.
///
/// The first call to [`deliver`](Self::deliver) runs a callback and clears
/// the shared listening flag; every later call is ignored.
#[derive(Clone)]
pub struct RecognitionSink {
    callbacks: Arc<Mutex<Option<(ResultCallback, ErrorCallback)>>>,
    listening: Arc<AtomicBool>,
}

impl RecognitionSink {
    pub fn new(
        on_result: ResultCallback,
        on_error: ErrorCallback,
        listening: Arc<AtomicBool>,
    ) -> Self {
        Self {
            callbacks: Arc::new(Mutex::new(Some((on_result, on_error)))),
            listening,
        }
    }

    /// Complete the capture.  Returns `false` if it was already completed.
    ///
    /// A blank transcript is reported as [`RecognitionError::NoSpeech`].
    pub fn deliver(&self, outcome: Result<String, RecognitionError>) -> bool {
        let taken = match self.callbacks.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some((on_result, on_error)) = taken else {
            return false;
        };
        self.listening.store(false, Ordering::SeqCst);

        match outcome {
            Ok(transcript) if !transcript.trim().is_empty() => on_result(transcript),
            Ok(_) => on_error(RecognitionError::NoSpeech),
            Err(e) => {
                log::warn!("Speech recognition error: {}", e.code());
                on_error(e)
            }
        }
        true
    }

    #[cfg(test)]
    fn is_done(&self) -> bool {
        match self.callbacks.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Backend for single-utterance recognition.
pub trait SpeechRecognizer: Send {
    /// Whether this backend can recognise speech at all.
    fn is_supported(&self) -> bool;

    /// Begin one capture that completes through `sink`.
    ///
    /// An `Err` means nothing was started and the sink has not been used.
    fn start(&mut self, sink: RecognitionSink) -> Result<(), RecognitionError>;

    /// Cancel the capture in progress, if any.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// MicrophoneRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct EndpointSettings {
    vad_threshold: f32,
    trailing_silence_ms: u64,
    max_listen_secs: f32,
}

/// cpal capture + energy endpointing + Whisper.
pub struct MicrophoneRecognizer {
    engine: Option<Arc<dyn SttEngine>>,
    settings: EndpointSettings,
    cancel: Option<Arc<AtomicBool>>,
    worker: Option<JoinHandle<()>>,
}

impl MicrophoneRecognizer {
    pub fn new(engine: Option<Arc<dyn SttEngine>>, config: &SpeechConfig) -> Self {
        Self {
            engine,
            settings: EndpointSettings {
                vad_threshold: config.vad_threshold,
                trailing_silence_ms: config.trailing_silence_ms,
                max_listen_secs: config.max_listen_secs,
            },
            cancel: None,
            worker: None,
        }
    }

    /// Load the configured Whisper model.  Without it recognition is
    /// reported as unsupported.
    pub fn from_config(config: &SpeechConfig, paths: &AppPaths) -> Self {
        let model_path = paths.model_file(&config.stt_model);
        let engine: Option<Arc<dyn SttEngine>> =
            match WhisperEngine::load(&model_path, TranscribeParams::from_config(config)) {
                Ok(engine) => {
                    log::info!("Whisper model loaded: {}", model_path.display());
                    Some(Arc::new(engine))
                }
                Err(e) => {
                    log::warn!("Speech recognition unavailable: {e}");
                    None
                }
            };
        Self::new(engine, config)
    }
}

impl SpeechRecognizer for MicrophoneRecognizer {
    fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    fn start(&mut self, sink: RecognitionSink) -> Result<(), RecognitionError> {
        let engine = self.engine.clone().ok_or(RecognitionError::NotSupported)?;
        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&cancel));
        let settings = self.settings;

        // A cancelled capture may still hold the microphone or be inside
        // Whisper; the new one waits for it to exit.
        let previous = self.worker.take();
        let worker = spawn_after(previous, "speech-capture", move || {
            let outcome = capture_utterance(settings, &cancel)
                .and_then(|audio| transcribe(engine.as_ref(), audio, &cancel));
            sink.deliver(outcome);
        })
        .map_err(|e| {
            log::error!("Failed to spawn capture thread: {e}");
            RecognitionError::FailedToStart
        })?;
        self.worker = Some(worker);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::SeqCst);
        }
    }
}

/// Run `job` on a named thread once `previous` has finished.
fn spawn_after(
    previous: Option<JoinHandle<()>>,
    name: &str,
    job: impl FnOnce() + Send + 'static,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new().name(name.into()).spawn(move || {
        if let Some(previous) = previous {
            if previous.join().is_err() {
                log::warn!("Previous capture thread panicked");
            }
        }
        job();
    })
}

/// Record until the endpointer reports the end of one utterance.
fn capture_utterance(
    settings: EndpointSettings,
    cancel: &AtomicBool,
) -> Result<Vec<f32>, RecognitionError> {
    let capture = AudioCapture::open().map_err(classify_capture_error)?;
    let (tx, rx) = mpsc::channel();
    let stream = capture.start(tx).map_err(classify_capture_error)?;
    log::debug!("Listening ({} Hz, {} ch)", capture.sample_rate(), capture.channels());

    let mut endpointer = Endpointer::new(
        settings.vad_threshold,
        settings.trailing_silence_ms,
        settings.max_listen_secs,
    );
    // Guards against a device that stops delivering buffers.
    let deadline = Instant::now() + Duration::from_secs_f32(settings.max_listen_secs.max(0.0) + 2.0);

    loop {
        if cancel.load(Ordering::SeqCst) {
            return Err(RecognitionError::aborted());
        }
        if Instant::now() >= deadline {
            break;
        }
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(chunk) => {
                if endpointer.push(&prepare_chunk(&chunk)) == EndpointState::Complete {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(RecognitionError::AudioCapture),
        }
    }
    drop(stream);

    endpointer.into_utterance().ok_or(RecognitionError::NoSpeech)
}

fn transcribe(
    engine: &dyn SttEngine,
    audio: Vec<f32>,
    cancel: &AtomicBool,
) -> Result<String, RecognitionError> {
    let result = engine.transcribe(&pad_to_minimum(audio));
    if cancel.load(Ordering::SeqCst) {
        return Err(RecognitionError::aborted());
    }
    match result {
        Ok(text) => Ok(clean_transcript(&text)),
        Err(SttError::AudioTooShort) => Err(RecognitionError::NoSpeech),
        Err(e) => Err(RecognitionError::Other(e.to_string())),
    }
}

fn classify_capture_error(e: CaptureError) -> RecognitionError {
    log::warn!("Microphone capture failed: {e}");
    if e.is_permission_denied() {
        RecognitionError::NotAllowed
    } else if e.is_device_missing() {
        RecognitionError::AudioCapture
    } else if matches!(e, CaptureError::BuildStream(_) | CaptureError::PlayStream(_)) {
        RecognitionError::FailedToStart
    } else {
        RecognitionError::AudioCapture
    }
}

fn annotation_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("static regex"))
}

/// Drop Whisper's non-speech annotations (`[BLANK_AUDIO]`, `(wind blowing)`)
/// and collapse whitespace.
pub fn clean_transcript(text: &str) -> String {
    annotation_pattern()
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

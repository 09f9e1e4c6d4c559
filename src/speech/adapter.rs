//! The speech facade used by the screens.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::recognizer::{RecognitionSink, SpeechRecognizer};
use super::synthesizer::{DoneCallback, EndCallback, SpeechSynthesizer};
use super::voice::{pick_voice, UtteranceSettings, Voice};
use super::RecognitionError;

/// Owns the recognition and synthesis backends and the two status flags.
///
/// One instance is created by the shell and lent to whichever screen is
/// active.  Callbacks run on backend threads; screens forward them through
/// channels.
pub struct SpeechAdapter {
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    recognition_supported: bool,
    listening: Arc<AtomicBool>,
    speaking: Arc<AtomicBool>,
    utterance: Arc<AtomicU64>,
    sink: Option<RecognitionSink>,
    voices: Option<Vec<Voice>>,
    settings: UtteranceSettings,
}

impl SpeechAdapter {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        let recognition_supported = recognizer.is_supported();
        log::info!(
            "Speech recognition {}, synthesis {}",
            if recognition_supported { "available" } else { "unavailable" },
            if synthesizer.is_available() { "available" } else { "unavailable" },
        );
        Self {
            recognizer,
            synthesizer,
            recognition_supported,
            listening: Arc::new(AtomicBool::new(false)),
            speaking: Arc::new(AtomicBool::new(false)),
            utterance: Arc::new(AtomicU64::new(0)),
            sink: None,
            voices: None,
            settings: UtteranceSettings::default(),
        }
    }

    /// Capture one utterance.  Exactly one of the callbacks fires.  Ignored
    /// while a capture is already running.
    pub fn start_listening(
        &mut self,
        on_result: impl FnOnce(String) + Send + 'static,
        on_error: impl FnOnce(RecognitionError) + Send + 'static,
    ) {
        if !self.recognition_supported {
            on_error(RecognitionError::NotSupported);
            return;
        }
        if self.listening.swap(true, Ordering::SeqCst) {
            log::debug!("Already listening; start ignored");
            return;
        }

        let sink = RecognitionSink::new(
            Box::new(on_result),
            Box::new(on_error),
            Arc::clone(&self.listening),
        );
        self.sink = Some(sink.clone());
        if let Err(e) = self.recognizer.start(sink.clone()) {
            let e = match e {
                RecognitionError::NotSupported => e,
                RecognitionError::Other(_) => RecognitionError::FailedToStart,
                other => other,
            };
            sink.deliver(Err(e));
            self.sink = None;
        }
    }

    /// Cancel the capture in progress; its error callback receives
    /// `aborted`.  Safe when idle.
    pub fn stop_listening(&mut self) {
        self.recognizer.stop();
        if let Some(sink) = self.sink.take() {
            sink.deliver(Err(RecognitionError::aborted()));
        }
    }

    /// Speak `text`, cancelling whatever is playing.  `on_end` fires once
    /// if the utterance finishes on its own.  When playback cannot start or
    /// the backend fails part way, `on_end` is dropped and the speaking flag
    /// is cleared.
    pub fn speak(&mut self, text: &str, on_end: Option<EndCallback>) {
        self.stop_speaking();
        if text.trim().is_empty() {
            return;
        }

        let voices = self
            .voices
            .get_or_insert_with(|| self.synthesizer.voices());
        let voice = pick_voice(voices).cloned();

        let id = self.utterance.fetch_add(1, Ordering::SeqCst) + 1;
        let speaking = Arc::clone(&self.speaking);
        let current = Arc::clone(&self.utterance);
        speaking.store(true, Ordering::SeqCst);

        let finished: DoneCallback = Box::new(move |completed| {
            if current.load(Ordering::SeqCst) == id {
                speaking.store(false, Ordering::SeqCst);
            }
            if !completed {
                return;
            }
            if let Some(cb) = on_end {
                cb();
            }
        });

        if let Err(e) = self
            .synthesizer
            .speak(text, voice.as_ref(), self.settings, finished)
        {
            log::warn!("Speech synthesis failed: {e}");
            self.speaking.store(false, Ordering::SeqCst);
        }
    }

    /// Stop playback.  The pending `on_end`, if any, is dropped.
    pub fn stop_speaking(&mut self) {
        self.utterance.fetch_add(1, Ordering::SeqCst);
        self.synthesizer.cancel();
        self.speaking.store(false, Ordering::SeqCst);
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub fn is_recognition_supported(&self) -> bool {
        self.recognition_supported
    }

    pub fn is_synthesis_supported(&self) -> bool {
        self.synthesizer.is_available()
    }
}

impl Drop for SpeechAdapter {
    fn drop(&mut self) {
        self.recognizer.stop();
        self.synthesizer.cancel();
    }
}

/// Scriptable backends shared by the adapter and screen tests.
#[cfg(test)]
pub mod fakes {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    pub struct FakeRecognizerState {
        pub starts: usize,
        pub stops: usize,
        pub sink: Option<RecognitionSink>,
        pub start_error: Option<RecognitionError>,
    }

    /// Holds on to the sink so the test decides when and how it completes.
    #[derive(Clone)]
    pub struct FakeRecognizer {
        pub supported: bool,
        pub state: Arc<Mutex<FakeRecognizerState>>,
    }

    impl FakeRecognizer {
        pub fn new(supported: bool) -> Self {
            Self {
                supported,
                state: Arc::default(),
            }
        }

        /// Complete the most recent capture.
        pub fn finish(&self, outcome: Result<String, RecognitionError>) -> bool {
            let sink = self.state.lock().unwrap().sink.take();
            sink.is_some_and(|s| s.deliver(outcome))
        }

        pub fn starts(&self) -> usize {
            self.state.lock().unwrap().starts
        }
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn start(&mut self, sink: RecognitionSink) -> Result<(), RecognitionError> {
            let mut state = self.state.lock().unwrap();
            state.starts += 1;
            if let Some(e) = state.start_error.clone() {
                return Err(e);
            }
            state.sink = Some(sink);
            Ok(())
        }

        fn stop(&mut self) {
            self.state.lock().unwrap().stops += 1;
        }
    }

    #[derive(Default)]
    pub struct FakeSynthesizerState {
        pub spoken: Vec<(String, Option<Voice>, UtteranceSettings)>,
        pub pending: Option<DoneCallback>,
        pub cancels: usize,
    }

    #[derive(Clone)]
    pub struct FakeSynthesizer {
        pub available: bool,
        pub voices: Vec<Voice>,
        pub state: Arc<Mutex<FakeSynthesizerState>>,
    }

    impl FakeSynthesizer {
        pub fn new(available: bool, voices: Vec<Voice>) -> Self {
            Self {
                available,
                voices,
                state: Arc::default(),
            }
        }

        /// Let the current utterance finish naturally.
        pub fn finish(&self) {
            self.complete(true);
        }

        /// Make the current utterance fail part way.
        pub fn fail(&self) {
            self.complete(false);
        }

        fn complete(&self, completed: bool) {
            let cb = self.state.lock().unwrap().pending.take();
            if let Some(cb) = cb {
                cb(completed);
            }
        }

        pub fn spoken_texts(&self) -> Vec<String> {
            self.state
                .lock()
                .unwrap()
                .spoken
                .iter()
                .map(|(t, _, _)| t.clone())
                .collect()
        }
    }

    impl SpeechSynthesizer for FakeSynthesizer {
        fn is_available(&self) -> bool {
            self.available
        }

        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        fn speak(
            &mut self,
            text: &str,
            voice: Option<&Voice>,
            settings: UtteranceSettings,
            on_done: DoneCallback,
        ) -> Result<(), super::super::SynthesisError> {
            if !self.available {
                return Err(super::super::SynthesisError::Unavailable);
            }
            let mut state = self.state.lock().unwrap();
            state.spoken.push((text.to_string(), voice.cloned(), settings));
            state.pending = Some(on_done);
            Ok(())
        }

        fn cancel(&mut self) {
            let mut state = self.state.lock().unwrap();
            state.cancels += 1;
            state.pending = None;
        }
    }

    pub fn adapter(recognizer: &FakeRecognizer, synthesizer: &FakeSynthesizer) -> SpeechAdapter {
        SpeechAdapter::new(Box::new(recognizer.clone()), Box::new(synthesizer.clone()))
    }
}

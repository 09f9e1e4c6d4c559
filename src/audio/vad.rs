//! Energy-based voice activity detection and end-of-utterance detection.
//!
//! Audio is split into 30 ms frames (480 samples at 16 kHz).  A frame is
//! voiced when its RMS exceeds the threshold.
//!
//! [`Endpointer`] consumes a live 16 kHz stream and decides when one
//! utterance is over: after voiced audio followed by enough trailing
//! silence, or when the listening window runs out.

/// 30 ms at 16 kHz.
const FRAME_SAMPLES: usize = 480;

/// Frame-level RMS classifier.
#[derive(Debug, Clone, Copy)]
pub struct VadDetector {
    rms_threshold: f32,
}

impl VadDetector {
    pub fn new(rms_threshold: f32) -> Self {
        Self { rms_threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.rms_threshold
    }

    pub fn is_voiced(&self, frame: &[f32]) -> bool {
        if frame.is_empty() {
            return false;
        }
        let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        mean_sq.sqrt() > self.rms_threshold
    }

    /// Sub-slice from the first to the last voiced frame; empty when the
    /// whole clip is silent.
    pub fn trim_silence<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let voiced: Vec<usize> = audio
            .chunks(FRAME_SAMPLES)
            .enumerate()
            .filter(|(_, frame)| self.is_voiced(frame))
            .map(|(i, _)| i)
            .collect();

        match (voiced.first(), voiced.last()) {
            (Some(&first), Some(&last)) => {
                let start = first * FRAME_SAMPLES;
                let end = ((last + 1) * FRAME_SAMPLES).min(audio.len());
                &audio[start..end]
            }
            _ => &audio[0..0],
        }
    }
}

/// Where the endpointer is within one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// No voiced frame yet.
    Waiting,
    /// Voice heard; waiting for trailing silence.
    Speaking,
    /// The utterance is over (or the window expired).
    Complete,
}

/// Streaming end-of-utterance detector.
pub struct Endpointer {
    vad: VadDetector,
    trailing_silence_frames: usize,
    max_samples: usize,
    pending: Vec<f32>,
    audio: Vec<f32>,
    heard_voice: bool,
    silent_run: usize,
    state: EndpointState,
}

impl Endpointer {
    /// * `trailing_silence_ms` – silence after speech that ends the utterance.
    /// * `max_listen_secs` – hard cap on the listening window.
    pub fn new(rms_threshold: f32, trailing_silence_ms: u64, max_listen_secs: f32) -> Self {
        let frame_ms = (FRAME_SAMPLES as u64 * 1000) / 16_000;
        Self {
            vad: VadDetector::new(rms_threshold),
            trailing_silence_frames: (trailing_silence_ms / frame_ms).max(1) as usize,
            max_samples: (max_listen_secs.max(0.0) * 16_000.0) as usize,
            pending: Vec::with_capacity(FRAME_SAMPLES),
            audio: Vec::new(),
            heard_voice: false,
            silent_run: 0,
            state: EndpointState::Waiting,
        }
    }

    pub fn state(&self) -> EndpointState {
        self.state
    }

    pub fn heard_voice(&self) -> bool {
        self.heard_voice
    }

    /// Feed 16 kHz mono samples; returns the state after consuming them.
    pub fn push(&mut self, samples: &[f32]) -> EndpointState {
        if self.state == EndpointState::Complete {
            return self.state;
        }
        self.pending.extend_from_slice(samples);

        while self.pending.len() >= FRAME_SAMPLES {
            let frame: Vec<f32> = self.pending.drain(..FRAME_SAMPLES).collect();
            let voiced = self.vad.is_voiced(&frame);
            self.audio.extend_from_slice(&frame);

            if voiced {
                self.heard_voice = true;
                self.silent_run = 0;
                self.state = EndpointState::Speaking;
            } else if self.heard_voice {
                self.silent_run += 1;
                if self.silent_run >= self.trailing_silence_frames {
                    self.state = EndpointState::Complete;
                    break;
                }
            }

            if self.audio.len() >= self.max_samples {
                self.state = EndpointState::Complete;
                break;
            }
        }
        self.state
    }

    /// The voiced part of the captured audio, or `None` if nothing was
    /// voiced.
    pub fn into_utterance(self) -> Option<Vec<f32>> {
        if !self.heard_voice {
            return None;
        }
        let trimmed = self.vad.trim_silence(&self.audio);
        (!trimmed.is_empty()).then(|| trimmed.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(silent_pre: usize, voice: usize, silent_post: usize) -> Vec<f32> {
        let mut v = vec![0.0_f32; silent_pre];
        v.extend(vec![0.5_f32; voice]);
        v.extend(vec![0.0_f32; silent_post]);
        v
    }

    #[test]
    fn trim_keeps_voiced_middle() {
        let vad = VadDetector::new(0.01);
        assert_eq!(vad.trim_silence(&signal(480, 480, 480)).len(), 480);
    }

    #[test]
    fn trim_all_silence_is_empty() {
        let vad = VadDetector::new(0.01);
        assert!(vad.trim_silence(&vec![0.0; 1440]).is_empty());
        assert!(vad.trim_silence(&[]).is_empty());
    }

    #[test]
    fn endpoint_after_trailing_silence() {
        // 300 ms trailing silence = 10 frames.
        let mut ep = Endpointer::new(0.01, 300, 30.0);
        assert_eq!(ep.push(&vec![0.0; 960]), EndpointState::Waiting);
        assert_eq!(ep.push(&vec![0.5; 4800]), EndpointState::Speaking);
        assert_eq!(ep.push(&vec![0.0; 480 * 9]), EndpointState::Speaking);
        assert_eq!(ep.push(&vec![0.0; 480]), EndpointState::Complete);

        let utterance = ep.into_utterance().expect("voiced audio");
        assert_eq!(utterance.len(), 4800);
    }

    #[test]
    fn silence_only_window_expires_without_utterance() {
        let mut ep = Endpointer::new(0.01, 300, 0.5);
        assert_eq!(ep.push(&vec![0.0; 16_000]), EndpointState::Complete);
        assert!(!ep.heard_voice());
        assert!(ep.into_utterance().is_none());
    }

    #[test]
    fn partial_frames_are_buffered() {
        let mut ep = Endpointer::new(0.01, 300, 30.0);
        assert_eq!(ep.push(&vec![0.5; 200]), EndpointState::Waiting);
        assert_eq!(ep.push(&vec![0.5; 280]), EndpointState::Speaking);
    }

    #[test]
    fn max_window_cuts_continuous_speech() {
        let mut ep = Endpointer::new(0.01, 300, 1.0);
        assert_eq!(ep.push(&vec![0.5; 20_000]), EndpointState::Complete);
        let utterance = ep.into_utterance().expect("voiced audio");
        assert!(utterance.len() <= 16_320);
    }

    #[test]
    fn push_after_complete_is_ignored() {
        let mut ep = Endpointer::new(0.01, 30, 30.0);
        ep.push(&vec![0.5; 480]);
        assert_eq!(ep.push(&vec![0.0; 480]), EndpointState::Complete);
        assert_eq!(ep.push(&vec![0.5; 4800]), EndpointState::Complete);
        assert_eq!(ep.into_utterance().map(|u| u.len()), Some(480));
    }
}

//! Conversion of captured audio into the 16 kHz mono stream Whisper expects.
//!
//! Microphones usually deliver 44.1 or 48 kHz with one or two interleaved
//! channels.  [`prepare_chunk`] runs both conversion steps on a chunk.

use super::AudioChunk;

/// Sample rate the recognizer works at.
pub const TARGET_RATE: u32 = 16_000;

/// Average interleaved channels down to mono.
///
/// `channels == 0` yields an empty buffer; a trailing partial frame is
/// dropped.
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Linear-interpolation resample from `source_rate` to [`TARGET_RATE`].
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == TARGET_RATE || source_rate == 0 {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let step = source_rate as f64 / TARGET_RATE as f64;
    let out_len = (samples.len() as f64 / step).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos as usize).min(last);
            let frac = (pos - idx as f64) as f32;
            let next = samples[(idx + 1).min(last)];
            samples[idx] + (next - samples[idx]) * frac
        })
        .collect()
}

/// Downmix and resample one captured chunk.
pub fn prepare_chunk(chunk: &AudioChunk) -> Vec<f32> {
    let mono = downmix(&chunk.samples, chunk.channels);
    resample_to_16k(&mono, chunk.sample_rate)
}

//! Microphone capture via `cpal`.
//!
//! [`AudioCapture::open`] picks the default input device and
//! [`AudioCapture::start`] streams [`AudioChunk`]s over an mpsc channel.
//! The returned [`StreamHandle`] keeps the stream alive; dropping it stops
//! capture.  `cpal::Stream` is not `Send` on every platform, so open, start
//! and drop all happen on the thread that owns the capture.

use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

/// One buffer of interleaved `f32` samples from the cpal callback.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Keeps the cpal stream running until dropped.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

impl CaptureError {
    /// The device exists but the OS refused access to it.
    pub fn is_permission_denied(&self) -> bool {
        let text = self.to_string().to_lowercase();
        ["permission", "denied", "not authorized", "unauthorized"]
            .iter()
            .any(|needle| text.contains(needle))
    }

    /// No usable input hardware.
    pub fn is_device_missing(&self) -> bool {
        matches!(
            self,
            CaptureError::NoDevice
                | CaptureError::DefaultConfig(cpal::DefaultStreamConfigError::DeviceNotAvailable)
                | CaptureError::BuildStream(cpal::BuildStreamError::DeviceNotAvailable)
        )
    }
}

/// The default input device and its preferred stream config.
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    pub fn open() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        let supported = device.default_input_config()?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        if let Ok(name) = device.name() {
            log::debug!("Input device: {name} ({sample_rate} Hz, {channels} ch)");
        }

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming into `tx`.  Send errors are ignored; the receiver
    /// going away simply means the capture is being torn down.
    pub fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<StreamHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioChunk>();
    }

    #[test]
    fn missing_device_classification() {
        assert!(CaptureError::NoDevice.is_device_missing());
        assert!(!CaptureError::NoDevice.is_permission_denied());
        assert!(CaptureError::BuildStream(cpal::BuildStreamError::DeviceNotAvailable)
            .is_device_missing());
    }

    #[test]
    fn permission_text_is_detected() {
        let err = CaptureError::PlayStream(cpal::PlayStreamError::BackendSpecific {
            err: cpal::BackendSpecificError {
                description: "Microphone permission denied by the user".into(),
            },
        });
        assert!(err.is_permission_denied());
        assert!(!err.is_device_missing());
    }
}

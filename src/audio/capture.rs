//! Microphone capture via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle.  The input
//! device is resolved by *name* from [`AudioSettings::input_device`] against
//! the enumerated device list; a configured name that matches nothing is a
//! hard error rather than a silent fallback to the default device.
//!
//! Call [`AudioCapture::start`] to begin streaming [`AudioChunk`]s over an
//! mpsc channel.  The returned [`StreamHandle`] is a RAII guard — dropping
//! it stops the underlying cpal stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use thiserror::Error;

use crate::config::AudioSettings;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in the range `[-1.0, 1.0]` at the stream's
/// configured sample rate and channel count.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value stops the underlying hardware stream.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running a recording.
///
/// Any variant aborts the current pipeline run; no recording file is written
/// on failure.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("configured input device not found: {0:?}")]
    DeviceNotFound(String),

    #[error("failed to enumerate input devices: {0}")]
    Enumerate(#[from] cpal::DevicesError),

    #[error("recording duration must be a positive number of seconds")]
    ZeroDuration,

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio device stopped delivering samples mid-recording")]
    Stalled,

    #[error("recording cancelled")]
    Cancelled,

    #[error("failed to write recording: {0}")]
    Persist(#[from] hound::Error),

    #[error("failed to write recording: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Microphone capture device wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::mpsc;
/// use rehearse::audio::{AudioCapture, AudioChunk};
/// use rehearse::config::AudioSettings;
///
/// let (tx, rx) = mpsc::channel::<AudioChunk>();
/// let capture = AudioCapture::new(&AudioSettings::default()).unwrap();
/// let _handle = capture.start(tx).unwrap();
/// // `_handle` keeps the stream alive; drop it to stop recording.
/// ```
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
}

impl AudioCapture {
    /// Create a new [`AudioCapture`] for the configured input device.
    ///
    /// `settings.input_device == None` selects the system default device.
    /// A named device is looked up in the host's input-device list.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] when no default device exists,
    /// [`CaptureError::DeviceNotFound`] when the configured name matches no
    /// enumerated device.
    pub fn new(settings: &AudioSettings) -> Result<Self, CaptureError> {
        let host = cpal::default_host();

        let device = match settings.input_device.as_deref() {
            None => host.default_input_device().ok_or(CaptureError::NoDevice)?,
            Some(name) => Self::find_device(&host, name)?,
        };

        let config = cpal::StreamConfig {
            channels: settings.channels,
            sample_rate: cpal::SampleRate(settings.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self { device, config })
    }

    /// Resolve a device by exact name against the enumerated input devices.
    fn find_device(host: &cpal::Host, name: &str) -> Result<cpal::Device, CaptureError> {
        for device in host.input_devices()? {
            if device.name().map(|n| n == name).unwrap_or(false) {
                return Ok(device);
            }
        }
        Err(CaptureError::DeviceNotFound(name.to_string()))
    }

    /// List the names of all available input devices on the default host.
    ///
    /// Used for the startup log so a user can correct a misconfigured
    /// `input_device` setting.
    pub fn device_names() -> Vec<String> {
        let host = cpal::default_host();
        host.input_devices()
            .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
            .unwrap_or_default()
    }

    /// Start recording and send [`AudioChunk`]s to `tx`.
    ///
    /// The cpal callback runs on a dedicated audio thread; each time the
    /// hardware delivers a buffer the raw `f32` samples are wrapped in an
    /// [`AudioChunk`] and forwarded over the channel.  Send errors (receiver
    /// dropped) are silently ignored so the audio thread never panics.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::BuildStream`] or [`CaptureError::PlayStream`]
    /// if the platform rejects the stream configuration.
    pub fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<StreamHandle, CaptureError> {
        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Ignore send errors; the receiver may have been dropped.
                let _ = tx.send(AudioChunk {
                    samples: data.to_vec(),
                });
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// `AudioChunk` must be `Send` so it can cross thread boundaries.
    #[test]
    fn audio_chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioChunk>();
    }

    #[test]
    fn audio_chunk_fields() {
        let chunk = AudioChunk {
            samples: vec![0.0_f32; 512],
        };
        assert_eq!(chunk.samples.len(), 512);
    }
}

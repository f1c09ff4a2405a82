//! Fixed-duration recording on top of [`AudioCapture`].
//!
//! [`Capturer`] is the object-safe seam the pipeline runs against; the
//! production implementation [`MicCapturer`] opens the microphone stream,
//! collects exactly `duration_secs` of interleaved samples, and persists
//! them to the single-slot WAV file.  Tests implement [`Capturer`] with a
//! stub that produces a fixed buffer.
//!
//! Progress is reported as one tick per *captured* second — purely user
//! feedback, never load-bearing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::config::AudioSettings;

use super::capture::{AudioCapture, AudioChunk, CaptureError};
use super::wav::write_wav;

/// How long the collector waits without any chunk arriving before declaring
/// the device stalled.
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Poll interval for the cancel flag while waiting on the chunk channel.
const RECV_TIMEOUT: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Capturer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for the capture stage.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn Capturer>` and invoked from `tokio::task::spawn_blocking`.
///
/// # Contract
///
/// - Blocks for the full configured duration, invoking `on_tick(n)` once per
///   captured second (`n` starting at 1).
/// - On success the recording has been written to disk and its path is
///   returned; on any error **no** file has been written.
/// - Checks `cancel` periodically; a set flag aborts with
///   [`CaptureError::Cancelled`] and discards the buffer.
pub trait Capturer: Send + Sync {
    /// Record one fixed-duration take and persist it, returning the path.
    fn capture(&self, on_tick: &dyn Fn(u32), cancel: &AtomicBool)
        -> Result<PathBuf, CaptureError>;
}

// Compile-time assertion: Box<dyn Capturer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Capturer>) {}
};

// ---------------------------------------------------------------------------
// Sample collection
// ---------------------------------------------------------------------------

/// Drain `rx` until exactly `settings.total_samples()` interleaved samples
/// have been collected, then truncate to that length.
///
/// `on_tick` fires once for each full second of audio collected.  The cancel
/// flag is polled between receives so an abort is observed within
/// [`RECV_TIMEOUT`].
///
/// # Errors
///
/// - [`CaptureError::ZeroDuration`] — `duration_secs == 0`.
/// - [`CaptureError::Cancelled`]    — the cancel flag was set.
/// - [`CaptureError::Stalled`]      — no chunk arrived within
///   [`STALL_TIMEOUT`], or the sending side disconnected early.
pub fn collect_samples(
    rx: &mpsc::Receiver<AudioChunk>,
    settings: &AudioSettings,
    on_tick: &dyn Fn(u32),
    cancel: &AtomicBool,
) -> Result<Vec<f32>, CaptureError> {
    if settings.duration_secs == 0 {
        return Err(CaptureError::ZeroDuration);
    }

    let target = settings.total_samples();
    let samples_per_sec = settings.sample_rate as usize * settings.channels as usize;

    let mut samples: Vec<f32> = Vec::with_capacity(target);
    let mut ticked: u32 = 0;
    let mut last_chunk = Instant::now();

    while samples.len() < target {
        if cancel.load(Ordering::Relaxed) {
            return Err(CaptureError::Cancelled);
        }

        match rx.recv_timeout(RECV_TIMEOUT) {
            Ok(chunk) => {
                last_chunk = Instant::now();
                samples.extend_from_slice(&chunk.samples);

                // Emit a tick for each newly completed second of audio.
                while ticked < settings.duration_secs
                    && samples.len() >= (ticked as usize + 1) * samples_per_sec
                {
                    ticked += 1;
                    on_tick(ticked);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if last_chunk.elapsed() >= STALL_TIMEOUT {
                    return Err(CaptureError::Stalled);
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(CaptureError::Stalled);
            }
        }
    }

    // The final chunk usually overshoots; keep exactly the configured length.
    samples.truncate(target);
    Ok(samples)
}

// ---------------------------------------------------------------------------
// MicCapturer
// ---------------------------------------------------------------------------

/// Production [`Capturer`] backed by the cpal microphone stream.
///
/// Holds only configuration; the device and stream are opened per take so a
/// device that appears after startup is picked up on the next recording.
pub struct MicCapturer {
    settings: AudioSettings,
    wav_path: PathBuf,
}

impl MicCapturer {
    /// Create a capturer that records per `settings` into `wav_path`.
    pub fn new(settings: AudioSettings, wav_path: PathBuf) -> Self {
        Self { settings, wav_path }
    }
}

impl Capturer for MicCapturer {
    fn capture(
        &self,
        on_tick: &dyn Fn(u32),
        cancel: &AtomicBool,
    ) -> Result<PathBuf, CaptureError> {
        let capture = AudioCapture::new(&self.settings)?;

        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let handle = capture.start(tx)?;

        let samples = collect_samples(&rx, &self.settings, on_tick, cancel)?;

        // Stop the stream before touching the filesystem.
        drop(handle);

        log::debug!(
            "capture complete: {} samples ({} s @ {} Hz × {} ch)",
            samples.len(),
            self.settings.duration_secs,
            self.settings.sample_rate,
            self.settings.channels
        );

        write_wav(
            &self.wav_path,
            &samples,
            self.settings.sample_rate,
            self.settings.channels,
        )?;

        Ok(self.wav_path.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

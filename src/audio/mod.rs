//! Audio capture — microphone stream → fixed-duration buffer → WAV slot.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → collect_samples
//!           → write_wav (single slot, atomic replace)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::atomic::AtomicBool;
//! use rehearse::audio::{Capturer, MicCapturer};
//! use rehearse::config::AudioSettings;
//!
//! let capturer = MicCapturer::new(AudioSettings::default(), "recording.wav".into());
//! let cancel = AtomicBool::new(false);
//! let path = capturer
//!     .capture(&|sec| println!("recording… {sec} s"), &cancel)
//!     .unwrap();
//! println!("wrote {}", path.display());
//! ```

pub mod capture;
pub mod recorder;
pub mod wav;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use recorder::{collect_samples, Capturer, MicCapturer};
pub use wav::write_wav;

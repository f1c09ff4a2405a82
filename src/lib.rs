//! Speech rehearsal assistant.
//!
//! Records a fixed-duration take of a rehearsed speech from the microphone,
//! transcribes it through a remote speech-to-text service, and asks a remote
//! text-generation service for feedback comparing the transcript against the
//! prepared reference text.
//!
//! # Pipeline
//!
//! ```text
//! Capture (cpal → WAV slot)
//!   → Transcribe (/v1/audio/transcriptions)
//!   → Transcript log (append-only)
//!   → Compare (/v1/chat/completions)
//!   → Display (egui)
//! ```
//!
//! The pipeline runs on a background tokio task and talks to the UI over
//! mpsc channels; see [`pipeline`] for the orchestration and [`app`] for the
//! window.

pub mod app;
pub mod audio;
pub mod config;
pub mod feedback;
pub mod pipeline;
pub mod transcribe;

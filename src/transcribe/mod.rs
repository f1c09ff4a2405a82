//! Transcription module — remote speech-to-text plus the transcript log.
//!
//! * [`Transcriber`] — async trait implemented by all transcription backends.
//! * [`ApiTranscriber`] — OpenAI-compatible `/v1/audio/transcriptions` client.
//! * [`TranscriptLog`] — append-only plain-text log of every transcript.
//! * [`TranscriptionError`] — error variants for the transcription stage.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use rehearse::config::{ApiCredentials, TranscriptionSettings};
//! use rehearse::transcribe::{ApiTranscriber, Transcriber, TranscriptLog};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = TranscriptionSettings::default();
//!     let credentials = ApiCredentials::from_env().unwrap();
//!     let transcriber = ApiTranscriber::new(&settings, credentials);
//!
//!     let text = transcriber
//!         .transcribe(Path::new("recording.wav"))
//!         .await
//!         .unwrap();
//!
//!     let log = TranscriptLog::new("transcription.txt", settings.entry_separator);
//!     log.append(&text).unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod api;
pub mod log;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use api::{ApiTranscriber, Transcriber, TranscriptionError};
pub use log::TranscriptLog;

//! Pipeline orchestration for the speech rehearsal assistant.
//!
//! Wires the full capture → transcribe → compare flow and exposes the
//! channel message types the UI exchanges with the background runner.
//!
//! # Architecture
//!
//! ```text
//! PipelineCommand (mpsc)
//!        │
//!        ▼
//! PipelineRunner::run()  ← async tokio task
//!        │
//!        ├─ Start  → spawn run: capture (spawn_blocking) → transcribe
//!        │           → log append → compare
//!        └─ Cancel → shared cancel flag, observed by the capturer
//!        │
//!        ▼
//! PipelineResult (mpsc) ──▶ read by the egui update loop each frame
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineCommand, PipelineError, PipelineResult, PipelineRunner};
pub use state::PipelineState;

//! Pipeline state machine.
//!
//! [`PipelineState`] tracks where the current rehearsal run is.  The UI
//! renders from it and uses [`PipelineState::is_busy`] to disable the record
//! trigger while a run is in flight.

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the rehearsal pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──record trigger──▶ Recording
///       ──capture done───▶ Transcribing
///       ──transcript──────▶ Comparing
///       ──feedback────────▶ Displaying ──▶ Idle
/// any stage failure ──▶ Idle (with a visible error message)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Waiting for the user to trigger a recording.
    #[default]
    Idle,

    /// Microphone is active; the fixed-duration capture is running.
    Recording,

    /// The recording has been uploaded to the transcription service.
    Transcribing,

    /// The reference text and transcript are with the feedback service.
    Comparing,

    /// Feedback has arrived and is on screen.  A new recording may start.
    Displaying,
}

impl PipelineState {
    /// Returns `true` while a run is in flight.
    ///
    /// The UI uses this to disable the record trigger so a new recording
    /// cannot start while one is in progress.
    ///
    /// ```
    /// use rehearse::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Recording.is_busy());
    /// assert!(PipelineState::Transcribing.is_busy());
    /// assert!(PipelineState::Comparing.is_busy());
    /// assert!(!PipelineState::Displaying.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::Recording | PipelineState::Transcribing | PipelineState::Comparing
        )
    }

    /// A short human-readable label suitable for the UI status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Recording => "Recording",
            PipelineState::Transcribing => "Transcribing",
            PipelineState::Comparing => "Comparing",
            PipelineState::Displaying => "Done",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

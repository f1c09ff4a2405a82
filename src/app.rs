//! Speech rehearsal window — egui/eframe application.
//!
//! # Architecture
//!
//! [`RehearseApp`] is the top-level [`eframe::App`] that owns the UI state
//! and two channel endpoints:
//!
//! * `command_tx` — sends [`PipelineCommand`] to the pipeline runner.
//! * `result_rx`  — receives [`PipelineResult`] from the runner.
//!
//! The pipeline runs entirely on the tokio runtime, so the window stays
//! responsive for the whole capture + transcription + comparison span.  The
//! record trigger is disabled while a run is in flight; every stage failure
//! returns the UI to idle with a visible error message.
//!
//! # Surface
//!
//! One multi-line editable text area (the prepared speech), one trigger
//! button, a progress/status line, and one read-only feedback area whose
//! content is replaced when new feedback arrives.

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::pipeline::{PipelineCommand, PipelineResult, PipelineState};

// ---------------------------------------------------------------------------
// RehearseApp
// ---------------------------------------------------------------------------

/// eframe application — the rehearsal window.
pub struct RehearseApp {
    // ── Pipeline state ───────────────────────────────────────────────────
    /// Current logical state of the processing pipeline.
    pub pipeline_state: PipelineState,
    /// Latest transcript, shown while feedback is being generated.
    pub transcript_text: Option<String>,
    /// Latest feedback; replaced whenever a new run completes.
    pub feedback_text: Option<String>,
    /// Human-readable error from the last failed run.
    pub error_message: Option<String>,
    /// `(captured, total)` seconds while recording.
    pub progress: Option<(u32, u32)>,

    // ── Editor ───────────────────────────────────────────────────────────
    /// The prepared speech text; read at the moment the trigger fires.
    pub reference_text: String,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<PipelineCommand>,
    result_rx: mpsc::Receiver<PipelineResult>,

    // ── Configuration ────────────────────────────────────────────────────
    /// Application configuration (read-only after startup).
    pub config: AppConfig,
}

impl RehearseApp {
    /// Create a new [`RehearseApp`].
    ///
    /// * `command_tx` — sender end of the pipeline command channel.
    /// * `result_rx`  — receiver end of the pipeline result channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        command_tx: mpsc::Sender<PipelineCommand>,
        result_rx: mpsc::Receiver<PipelineResult>,
        config: AppConfig,
    ) -> Self {
        Self {
            pipeline_state: PipelineState::Idle,
            transcript_text: None,
            feedback_text: None,
            error_message: None,
            progress: None,
            reference_text: String::new(),
            command_tx,
            result_rx,
            config,
        }
    }

    /// Fold one pipeline result into the UI state.
    ///
    /// Kept free of egui types so the state machine is unit-testable.
    pub fn apply(&mut self, result: PipelineResult) {
        match result {
            PipelineResult::RecordingStarted => {
                self.pipeline_state = PipelineState::Recording;
                self.error_message = None;
                self.transcript_text = None;
                self.progress = Some((0, self.config.audio.duration_secs));
            }
            PipelineResult::RecordingProgress { seconds, total } => {
                self.progress = Some((seconds, total));
            }
            PipelineResult::RecordingComplete { .. } => {
                self.pipeline_state = PipelineState::Transcribing;
                self.progress = None;
            }
            PipelineResult::TranscriptReady { text } => {
                self.pipeline_state = PipelineState::Comparing;
                self.transcript_text = Some(text);
            }
            PipelineResult::FeedbackReady { text } => {
                self.pipeline_state = PipelineState::Displaying;
                self.feedback_text = Some(text);
            }
            PipelineResult::Cancelled => {
                self.pipeline_state = PipelineState::Idle;
                self.progress = None;
            }
            PipelineResult::Error { message } => {
                self.pipeline_state = PipelineState::Idle;
                self.error_message = Some(message);
                self.progress = None;
            }
        }
    }

    /// Fire the record trigger: read the editor text and start one run.
    fn start_run(&mut self) {
        let command = PipelineCommand::Start {
            reference: self.reference_text.clone(),
        };
        if self.command_tx.try_send(command).is_err() {
            log::warn!("ui: could not send Start — pipeline channel full or closed");
        }
    }

    fn cancel_run(&mut self) {
        if self.command_tx.try_send(PipelineCommand::Cancel).is_err() {
            log::warn!("ui: could not send Cancel — pipeline channel full or closed");
        }
    }

    fn status_line(&self) -> String {
        match (self.pipeline_state, self.progress) {
            (PipelineState::Recording, Some((seconds, total))) => {
                format!("Recording… {seconds}/{total} s")
            }
            (state, _) => state.label().to_string(),
        }
    }
}

impl eframe::App for RehearseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain pipeline results accumulated since the last frame.
        while let Ok(result) = self.result_rx.try_recv() {
            self.apply(result);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Speech Rehearsal Assistant");

            ui.label("Paste your speech text here:");
            egui::ScrollArea::vertical()
                .id_salt("reference")
                .max_height(ui.available_height() * 0.4)
                .show(ui, |ui| {
                    ui.add_sized(
                        [ui.available_width(), 160.0],
                        egui::TextEdit::multiline(&mut self.reference_text),
                    );
                });

            ui.add_space(8.0);

            let busy = self.pipeline_state.is_busy();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new("Record Speech"))
                    .clicked()
                {
                    self.start_run();
                }
                if ui.add_enabled(busy, egui::Button::new("Cancel")).clicked() {
                    self.cancel_run();
                }
                ui.label(self.status_line());
            });

            if let Some(error) = &self.error_message {
                ui.colored_label(egui::Color32::from_rgb(220, 120, 40), error);
            }

            ui.add_space(8.0);
            ui.separator();

            if let Some(transcript) = &self.transcript_text {
                ui.label(format!("Transcribed: {transcript}"));
            }

            if let Some(feedback) = &self.feedback_text {
                ui.label("Feedback:");
                egui::ScrollArea::vertical().id_salt("feedback").show(ui, |ui| {
                    let mut display = feedback.as_str();
                    ui.add_sized(
                        [ui.available_width(), 160.0],
                        egui::TextEdit::multiline(&mut display),
                    );
                });
            }
        });

        // Keep polling the result channel while a run is in flight.
        if self.pipeline_state.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

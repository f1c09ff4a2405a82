//! Pipeline orchestrator — drives the capture → transcribe → compare loop.
//!
//! [`PipelineRunner`] is an async task that listens for [`PipelineCommand`]s
//! and emits [`PipelineResult`]s back to the display layer, so the UI thread
//! never blocks on capture or network calls.
//!
//! # Pipeline flow
//!
//! ```text
//! PipelineCommand::Start { reference }
//!   └─▶ spawn_blocking(capturer.capture)        [Recording + per-second ticks]
//!         └─▶ transcriber.transcribe (async)    [Transcribing]
//!               ├─▶ transcript log append (single write)
//!               └─▶ comparator.compare (async)  [Comparing]
//!                     └─▶ FeedbackReady         [Displaying]
//!
//! Any stage failure → PipelineResult::Error, no later stage runs.
//! PipelineCommand::Cancel → sets the shared cancel flag; capture aborts,
//! remaining stages are skipped.
//! ```
//!
//! A `Start` received while a run is active is ignored — exactly one
//! recording can be in flight at a time.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::audio::{CaptureError, Capturer};
use crate::feedback::Comparator;
use crate::transcribe::{Transcriber, TranscriptLog};

// ---------------------------------------------------------------------------
// Commands and results
// ---------------------------------------------------------------------------

/// Commands sent from the UI to the pipeline runner.
#[derive(Debug, Clone)]
pub enum PipelineCommand {
    /// Start one rehearsal run.  `reference` is the prepared speech text,
    /// read from the editor at the moment the trigger fires.
    Start { reference: String },
    /// Abort the in-flight run and return to idle.
    Cancel,
}

/// Results / progress events delivered from the pipeline to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    /// Capture has begun.
    RecordingStarted,
    /// One more second of audio has been captured.
    RecordingProgress { seconds: u32, total: u32 },
    /// The recording was written; `path` is the WAV slot.
    RecordingComplete { path: PathBuf },
    /// Transcription finished and was appended to the log.
    TranscriptReady { text: String },
    /// Feedback arrived — the run is complete.
    FeedbackReady { text: String },
    /// The run was cancelled before completion.
    Cancelled,
    /// A stage failed; the pipeline is idle again.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Stage failures, formatted for display.
#[derive(Debug)]
pub enum PipelineError {
    /// Device or I/O failure during recording.
    Capture(String),
    /// Network/service failure or invalid audio.
    Transcription(String),
    /// The transcript could not be appended to the log.
    LogWrite(String),
    /// Network/service failure while requesting feedback.
    Comparison(String),
    /// Internal / unexpected error (e.g. tokio join failure).
    Internal(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Capture(msg) => write!(f, "Recording failed: {msg}"),
            PipelineError::Transcription(msg) => write!(f, "Transcription failed: {msg}"),
            PipelineError::LogWrite(msg) => write!(f, "Could not update transcript log: {msg}"),
            PipelineError::Comparison(msg) => write!(f, "Feedback request failed: {msg}"),
            PipelineError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineRunner
// ---------------------------------------------------------------------------

/// Drives the complete rehearsal pipeline.
///
/// Create with [`PipelineRunner::new`], then spawn [`run`](Self::run) on the
/// tokio runtime.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rehearse::pipeline::PipelineRunner;
/// use rehearse::transcribe::TranscriptLog;
///
/// # async fn example() {
/// # use rehearse::audio::Capturer;
/// # use rehearse::transcribe::Transcriber;
/// # use rehearse::feedback::Comparator;
/// # fn make_capturer() -> Arc<dyn Capturer> { unimplemented!() }
/// # fn make_transcriber() -> Arc<dyn Transcriber> { unimplemented!() }
/// # fn make_comparator() -> Arc<dyn Comparator> { unimplemented!() }
/// let runner = PipelineRunner::new(
///     make_capturer(),
///     make_transcriber(),
///     make_comparator(),
///     TranscriptLog::new("transcription.txt", true),
///     60,
/// );
///
/// let (command_tx, command_rx) = tokio::sync::mpsc::channel(16);
/// let (result_tx, result_rx) = tokio::sync::mpsc::channel(32);
/// tokio::spawn(runner.run(command_rx, result_tx));
/// // command_tx / result_rx go to the UI.
/// # let _ = command_tx; let _ = result_rx;
/// # }
/// ```
pub struct PipelineRunner {
    capturer: Arc<dyn Capturer>,
    transcriber: Arc<dyn Transcriber>,
    comparator: Arc<dyn Comparator>,
    log: TranscriptLog,
    duration_secs: u32,
}

impl PipelineRunner {
    /// Create a new runner.
    ///
    /// # Arguments
    ///
    /// * `capturer`      — fixed-duration microphone capture (e.g. [`crate::audio::MicCapturer`]).
    /// * `transcriber`   — speech-to-text backend (e.g. [`crate::transcribe::ApiTranscriber`]).
    /// * `comparator`    — feedback backend (e.g. [`crate::feedback::ApiComparator`]).
    /// * `log`           — append-only transcript log.
    /// * `duration_secs` — configured recording length, echoed in progress events.
    pub fn new(
        capturer: Arc<dyn Capturer>,
        transcriber: Arc<dyn Transcriber>,
        comparator: Arc<dyn Comparator>,
        log: TranscriptLog,
        duration_secs: u32,
    ) -> Self {
        Self {
            capturer,
            transcriber,
            comparator,
            log,
            duration_secs,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `command_rx` is closed.
    ///
    /// Each `Start` launches one run on a separate task so `Cancel` can be
    /// observed mid-run.  While a run is active further `Start` commands are
    /// dropped with a warning.
    pub async fn run(
        self,
        mut command_rx: mpsc::Receiver<PipelineCommand>,
        result_tx: mpsc::Sender<PipelineResult>,
    ) {
        let runner = Arc::new(self);
        let active = Arc::new(AtomicBool::new(false));
        let cancel = Arc::new(AtomicBool::new(false));

        while let Some(cmd) = command_rx.recv().await {
            match cmd {
                PipelineCommand::Start { reference } => {
                    if active.swap(true, Ordering::SeqCst) {
                        log::warn!("pipeline: Start ignored — a run is already active");
                        continue;
                    }
                    cancel.store(false, Ordering::SeqCst);

                    let runner = Arc::clone(&runner);
                    let active = Arc::clone(&active);
                    let cancel = Arc::clone(&cancel);
                    let tx = result_tx.clone();

                    tokio::spawn(async move {
                        runner.run_once(reference, cancel, &tx).await;
                        active.store(false, Ordering::SeqCst);
                    });
                }
                PipelineCommand::Cancel => {
                    log::debug!("pipeline: Cancel received");
                    cancel.store(true, Ordering::SeqCst);
                }
            }
        }

        log::info!("pipeline: command channel closed, runner shutting down");
    }

    // -----------------------------------------------------------------------
    // One rehearsal run
    // -----------------------------------------------------------------------

    /// Execute one full capture → transcribe → compare run.
    ///
    /// Every failure path sends exactly one terminal result (`Cancelled` or
    /// `Error`) and returns without running later stages.
    async fn run_once(
        &self,
        reference: String,
        cancel: Arc<AtomicBool>,
        tx: &mpsc::Sender<PipelineResult>,
    ) {
        // ── 1. Capture (blocking → thread pool) ──────────────────────────
        let _ = tx.send(PipelineResult::RecordingStarted).await;

        let capturer = Arc::clone(&self.capturer);
        let cancel_flag = Arc::clone(&cancel);
        let tick_tx = tx.clone();
        let total = self.duration_secs;

        let capture_result = tokio::task::spawn_blocking(move || {
            capturer.capture(
                &|seconds| {
                    // Progress is best-effort; a full channel is not an error.
                    let _ = tick_tx
                        .try_send(PipelineResult::RecordingProgress { seconds, total });
                },
                &cancel_flag,
            )
        })
        .await;

        let audio_path = match capture_result {
            Ok(Ok(path)) => path,
            Ok(Err(CaptureError::Cancelled)) => {
                log::info!("pipeline: recording cancelled");
                let _ = tx.send(PipelineResult::Cancelled).await;
                return;
            }
            Ok(Err(e)) => {
                self.send_error(tx, PipelineError::Capture(e.to_string())).await;
                return;
            }
            Err(e) => {
                self.send_error(tx, PipelineError::Internal(e.to_string())).await;
                return;
            }
        };

        let _ = tx
            .send(PipelineResult::RecordingComplete {
                path: audio_path.clone(),
            })
            .await;

        if cancel.load(Ordering::SeqCst) {
            let _ = tx.send(PipelineResult::Cancelled).await;
            return;
        }

        // ── 2. Transcription ─────────────────────────────────────────────
        let transcript = match self.transcriber.transcribe(&audio_path).await {
            Ok(text) => text,
            Err(e) => {
                self.send_error(tx, PipelineError::Transcription(e.to_string()))
                    .await;
                return;
            }
        };

        log::debug!("pipeline: transcript = {transcript:?}");

        // ── 3. Transcript log (after a successful transcription only) ────
        if let Err(e) = self.log.append(&transcript) {
            self.send_error(tx, PipelineError::LogWrite(e.to_string())).await;
            return;
        }

        let _ = tx
            .send(PipelineResult::TranscriptReady {
                text: transcript.clone(),
            })
            .await;

        if cancel.load(Ordering::SeqCst) {
            let _ = tx.send(PipelineResult::Cancelled).await;
            return;
        }

        // ── 4. Comparison ────────────────────────────────────────────────
        match self.comparator.compare(&reference, &transcript).await {
            Ok(feedback) => {
                let _ = tx.send(PipelineResult::FeedbackReady { text: feedback }).await;
            }
            Err(e) => {
                self.send_error(tx, PipelineError::Comparison(e.to_string()))
                    .await;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn send_error(&self, tx: &mpsc::Sender<PipelineResult>, err: PipelineError) {
        let message = err.to_string();
        log::error!("pipeline error: {message}");
        let _ = tx.send(PipelineResult::Error { message }).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::audio::write_wav;
    use crate::feedback::ComparisonError;
    use crate::transcribe::TranscriptionError;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Capturer that produces a fixed silent recording of `duration_secs`,
    /// ticking once per second with an optional delay per tick.
    struct SilentCapturer {
        path: PathBuf,
        duration_secs: u32,
        tick_delay: Duration,
    }

    impl Capturer for SilentCapturer {
        fn capture(
            &self,
            on_tick: &dyn Fn(u32),
            cancel: &AtomicBool,
        ) -> Result<PathBuf, CaptureError> {
            for sec in 1..=self.duration_secs {
                if cancel.load(Ordering::SeqCst) {
                    return Err(CaptureError::Cancelled);
                }
                std::thread::sleep(self.tick_delay);
                on_tick(sec);
            }
            let samples = vec![0.0_f32; self.duration_secs as usize * 16_000 * 2];
            write_wav(&self.path, &samples, 16_000, 2)?;
            Ok(self.path.clone())
        }
    }

    /// Capturer that always fails with a device error.
    struct BrokenCapturer;

    impl Capturer for BrokenCapturer {
        fn capture(
            &self,
            _on_tick: &dyn Fn(u32),
            _cancel: &AtomicBool,
        ) -> Result<PathBuf, CaptureError> {
            Err(CaptureError::NoDevice)
        }
    }

    /// Transcriber stub returning a fixed text (or a fixed error).
    struct StubTranscriber {
        reply: Result<String, ()>,
        called: AtomicBool,
    }

    impl StubTranscriber {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.into()),
                called: AtomicBool::new(false),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<String, TranscriptionError> {
            self.called.store(true, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(TranscriptionError::Timeout),
            }
        }
    }

    /// Comparator stub that records its arguments and returns a fixed reply.
    struct StubComparator {
        reply: String,
        called: AtomicBool,
        seen: Mutex<Option<(String, String)>>,
    }

    impl StubComparator {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.into(),
                called: AtomicBool::new(false),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Comparator for StubComparator {
        async fn compare(
            &self,
            reference: &str,
            transcript: &str,
        ) -> Result<String, ComparisonError> {
            self.called.store(true, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some((reference.into(), transcript.into()));
            Ok(self.reply.clone())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Fixture {
        _dir: TempDir,
        log_path: PathBuf,
        transcriber: Arc<StubTranscriber>,
        comparator: Arc<StubComparator>,
        runner: PipelineRunner,
    }

    fn make_fixture(
        capturer: Arc<dyn Capturer>,
        transcriber: StubTranscriber,
        comparator: StubComparator,
        duration_secs: u32,
        entry_separator: bool,
    ) -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let log_path = dir.path().join("transcription.txt");
        let transcriber = Arc::new(transcriber);
        let comparator = Arc::new(comparator);

        let runner = PipelineRunner::new(
            capturer,
            Arc::clone(&transcriber) as Arc<dyn Transcriber>,
            Arc::clone(&comparator) as Arc<dyn Comparator>,
            TranscriptLog::new(&log_path, entry_separator),
            duration_secs,
        );

        Fixture {
            _dir: dir,
            log_path,
            transcriber,
            comparator,
            runner,
        }
    }

    fn silent_capturer(dir: &TempDir, duration_secs: u32) -> Arc<dyn Capturer> {
        Arc::new(SilentCapturer {
            path: dir.path().join("recording.wav"),
            duration_secs,
            tick_delay: Duration::ZERO,
        })
    }

    /// Send `commands`, close the channel, and collect every result emitted
    /// until all senders are gone.
    async fn drive(runner: PipelineRunner, commands: Vec<PipelineCommand>) -> Vec<PipelineResult> {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (result_tx, mut result_rx) = mpsc::channel(64);

        let handle = tokio::spawn(runner.run(command_rx, result_tx));

        for cmd in commands {
            command_tx.send(cmd).await.unwrap();
        }
        drop(command_tx);
        handle.await.unwrap();

        let mut results = Vec::new();
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }
        results
    }

    fn start(reference: &str) -> PipelineCommand {
        PipelineCommand::Start {
            reference: reference.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// End-to-end scenario: 3 s silent capture, stub transcript
    /// "hello world", reference "hello there world".  The log ends with the
    /// transcript, the comparator sees both strings, and the displayed
    /// feedback equals the stub completion.
    #[tokio::test]
    async fn full_run_produces_stub_feedback() {
        let dir = TempDir::new().expect("temp dir");
        let fx = make_fixture(
            silent_capturer(&dir, 3),
            StubTranscriber::ok("hello world"),
            StubComparator::new("solid delivery, one point missed"),
            3,
            false,
        );

        let results = drive(fx.runner, vec![start("hello there world")]).await;

        assert_eq!(results.first(), Some(&PipelineResult::RecordingStarted));
        assert!(results
            .iter()
            .any(|r| matches!(r, PipelineResult::RecordingComplete { .. })));
        assert!(results
            .iter()
            .any(|r| *r == PipelineResult::TranscriptReady { text: "hello world".into() }));
        assert_eq!(
            results.last(),
            Some(&PipelineResult::FeedbackReady {
                text: "solid delivery, one point missed".into()
            })
        );

        // Log ends with exactly the transcript, no separator.
        let log = std::fs::read_to_string(&fx.log_path).expect("log");
        assert_eq!(log, "hello world");

        // The comparison request carried both texts verbatim.
        let seen = fx.comparator.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            Some(("hello there world".into(), "hello world".into()))
        );
    }

    /// Per-second progress ticks are forwarded with the configured total.
    #[tokio::test]
    async fn progress_ticks_are_forwarded() {
        let dir = TempDir::new().expect("temp dir");
        let fx = make_fixture(
            silent_capturer(&dir, 3),
            StubTranscriber::ok("text"),
            StubComparator::new("fine"),
            3,
            true,
        );

        let results = drive(fx.runner, vec![start("reference")]).await;

        let ticks: Vec<_> = results
            .iter()
            .filter_map(|r| match r {
                PipelineResult::RecordingProgress { seconds, total } => Some((*seconds, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![(1, 3), (2, 3), (3, 3)]);
    }

    /// A transcription failure appends nothing to the log and never invokes
    /// the comparator.
    #[tokio::test]
    async fn transcription_failure_skips_log_and_comparator() {
        let dir = TempDir::new().expect("temp dir");
        let fx = make_fixture(
            silent_capturer(&dir, 1),
            StubTranscriber::failing(),
            StubComparator::new("never seen"),
            1,
            true,
        );

        let results = drive(fx.runner, vec![start("reference")]).await;

        assert!(matches!(
            results.last(),
            Some(PipelineResult::Error { message }) if message.contains("Transcription failed")
        ));
        assert!(!fx.log_path.exists(), "log must not be touched");
        assert!(!fx.comparator.called.load(Ordering::SeqCst));
    }

    /// A capture failure surfaces as an error and runs no later stage.
    #[tokio::test]
    async fn capture_failure_runs_no_later_stage() {
        let fx = make_fixture(
            Arc::new(BrokenCapturer),
            StubTranscriber::ok("text"),
            StubComparator::new("never seen"),
            1,
            true,
        );

        let results = drive(fx.runner, vec![start("reference")]).await;

        assert!(matches!(
            results.last(),
            Some(PipelineResult::Error { message }) if message.contains("Recording failed")
        ));
        assert!(!fx.transcriber.called.load(Ordering::SeqCst));
        assert!(!fx.comparator.called.load(Ordering::SeqCst));
        assert!(!fx.log_path.exists());
    }

    /// An empty reference text still completes the run; the pipeline does
    /// not validate non-emptiness.
    #[tokio::test]
    async fn empty_reference_still_completes() {
        let dir = TempDir::new().expect("temp dir");
        let fx = make_fixture(
            silent_capturer(&dir, 1),
            StubTranscriber::ok("something was said"),
            StubComparator::new("degenerate feedback"),
            1,
            true,
        );

        let results = drive(fx.runner, vec![start("")]).await;

        assert_eq!(
            results.last(),
            Some(&PipelineResult::FeedbackReady {
                text: "degenerate feedback".into()
            })
        );
        let seen = fx.comparator.seen.lock().unwrap().clone();
        assert_eq!(seen.unwrap().0, "");
    }

    /// Cancel during capture aborts the run; nothing is transcribed,
    /// logged, or compared.
    #[tokio::test]
    async fn cancel_during_capture_aborts_cleanly() {
        let dir = TempDir::new().expect("temp dir");
        let slow = Arc::new(SilentCapturer {
            path: dir.path().join("recording.wav"),
            duration_secs: 60,
            tick_delay: Duration::from_millis(20),
        });
        let fx = make_fixture(
            slow,
            StubTranscriber::ok("text"),
            StubComparator::new("never seen"),
            60,
            true,
        );

        let results = drive(fx.runner, vec![start("reference"), PipelineCommand::Cancel]).await;

        assert!(results.contains(&PipelineResult::Cancelled));
        assert!(!fx.transcriber.called.load(Ordering::SeqCst));
        assert!(!fx.comparator.called.load(Ordering::SeqCst));
        assert!(!fx.log_path.exists());
    }

    /// With the separator enabled the log gains exactly one newline per run
    /// and prior content is untouched.
    #[tokio::test]
    async fn log_append_respects_separator_and_prior_content() {
        let dir = TempDir::new().expect("temp dir");
        let fx = make_fixture(
            silent_capturer(&dir, 1),
            StubTranscriber::ok("second take"),
            StubComparator::new("fine"),
            1,
            true,
        );
        std::fs::write(&fx.log_path, "first take\n").expect("seed log");

        drive(fx.runner, vec![start("reference")]).await;

        let log = std::fs::read_to_string(&fx.log_path).expect("log");
        assert_eq!(log, "first take\nsecond take\n");
    }

    /// A second Start while a run is active is ignored: exactly one run's
    /// worth of feedback is produced.
    #[tokio::test]
    async fn start_while_busy_is_ignored() {
        let dir = TempDir::new().expect("temp dir");
        let slow = Arc::new(SilentCapturer {
            path: dir.path().join("recording.wav"),
            duration_secs: 2,
            tick_delay: Duration::from_millis(20),
        });
        let fx = make_fixture(
            slow,
            StubTranscriber::ok("text"),
            StubComparator::new("once"),
            2,
            true,
        );

        let results = drive(
            fx.runner,
            vec![start("reference"), start("duplicate trigger")],
        )
        .await;

        let feedback_count = results
            .iter()
            .filter(|r| matches!(r, PipelineResult::FeedbackReady { .. }))
            .count();
        assert_eq!(feedback_count, 1);
    }
}

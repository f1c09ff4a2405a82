//! Application entry point — Speech Rehearsal Assistant.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Resolve the API credential from the environment (fail fast).
//! 4. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the capturer, transcriber, comparator, and transcript log.
//! 6. Create pipeline channels (`command`, `result`).
//! 7. Spawn the pipeline runner on the tokio runtime.
//! 8. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use rehearse::{
    app::RehearseApp,
    audio::{AudioCapture, Capturer, MicCapturer},
    config::{ApiCredentials, AppConfig, AppPaths},
    feedback::{ApiComparator, Comparator},
    pipeline::{PipelineCommand, PipelineResult, PipelineRunner},
    transcribe::{ApiTranscriber, Transcriber, TranscriptLog},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_inner_size([800.0, 600.0])
        .with_min_inner_size([480.0, 360.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Speech Rehearsal Assistant starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. API credential — resolved once, passed by value into both clients
    let credentials =
        ApiCredentials::from_env().context("an API key is required for the remote services")?;

    let paths = AppPaths::new();
    log::info!(
        "recording slot: {}, transcript log: {}",
        paths.recording_file.display(),
        paths.transcript_log.display()
    );

    if let Some(name) = &config.audio.input_device {
        log::info!(
            "configured input device: {name:?} (available: {:?})",
            AudioCapture::device_names()
        );
    }

    // 4. Tokio runtime (2 workers — capture tick forwarding + network)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Pipeline stages
    let capturer: Arc<dyn Capturer> = Arc::new(MicCapturer::new(
        config.audio.clone(),
        paths.recording_file.clone(),
    ));
    let transcriber: Arc<dyn Transcriber> = Arc::new(ApiTranscriber::new(
        &config.transcription,
        credentials.clone(),
    ));
    let comparator: Arc<dyn Comparator> =
        Arc::new(ApiComparator::new(&config.feedback, credentials));
    let transcript_log = TranscriptLog::new(
        paths.transcript_log.clone(),
        config.transcription.entry_separator,
    );

    // 6. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<PipelineCommand>(16);
    let (result_tx, result_rx) = mpsc::channel::<PipelineResult>(32);

    // 7. Spawn the pipeline runner onto the tokio runtime
    let runner = PipelineRunner::new(
        capturer,
        transcriber,
        comparator,
        transcript_log,
        config.audio.duration_secs,
    );
    rt.spawn(runner.run(command_rx, result_tx));

    // 8. Build the egui app and run it (blocks until the window is closed)
    let app = RehearseApp::new(command_tx, result_rx, config);

    eframe::run_native(
        "Speech Rehearsal Assistant",
        native_options(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}

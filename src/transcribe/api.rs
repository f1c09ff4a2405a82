//! Core `Transcriber` trait and `ApiTranscriber` implementation.
//!
//! `ApiTranscriber` uploads the recorded WAV to any OpenAI-compatible
//! `/v1/audio/transcriptions` endpoint as a multipart form and returns the
//! recognized text.  All connection details come from
//! [`TranscriptionSettings`]; the credential is an explicit value passed in
//! at construction, never ambient state.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ApiCredentials, TranscriptionSettings};

// ---------------------------------------------------------------------------
// TranscriptionError
// ---------------------------------------------------------------------------

/// Errors that can occur while transcribing a recording.
///
/// Any variant aborts the current pipeline run; nothing is appended to the
/// transcript log and the comparison stage never runs.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The audio file does not exist or could not be read.
    #[error("audio file not found: {0}")]
    MissingAudio(String),

    /// The audio file exists but holds zero bytes.
    #[error("audio file is empty: {0}")]
    EmptyAudio(String),

    /// HTTP transport or connection error, including non-success statuses.
    #[error("transcription request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("transcription request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),

    /// The service returned a response with no usable text.
    #[error("transcription service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscriptionError::Timeout
        } else {
            TranscriptionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async trait for speech-to-text backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Transcriber>`).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio_path` and return the text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}

// ---------------------------------------------------------------------------
// ApiTranscriber
// ---------------------------------------------------------------------------

/// Uploads recordings to an OpenAI-compatible `/v1/audio/transcriptions`
/// endpoint.
///
/// One request per recording — binary audio in, plain text out.  No
/// chunking, no streaming partial results, no local retry.
pub struct ApiTranscriber {
    client: reqwest::Client,
    settings: TranscriptionSettings,
    credentials: ApiCredentials,
}

impl ApiTranscriber {
    /// Build an `ApiTranscriber` from settings and an explicit credential.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `settings.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn new(settings: &TranscriptionSettings, credentials: ApiCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            settings: settings.clone(),
            credentials,
        }
    }

    /// The full endpoint URL requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.settings.base_url)
    }
}

#[async_trait]
impl Transcriber for ApiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        // Validate the file before any network I/O.
        let metadata = tokio::fs::metadata(audio_path)
            .await
            .map_err(|_| TranscriptionError::MissingAudio(audio_path.display().to_string()))?;

        if metadata.len() == 0 {
            return Err(TranscriptionError::EmptyAudio(
                audio_path.display().to_string(),
            ));
        }

        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording.wav".into());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.settings.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.credentials.api_key())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or(TranscriptionError::EmptyResponse)?
            .to_string();

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

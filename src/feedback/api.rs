//! Core `Comparator` trait and `ApiComparator` implementation.
//!
//! `ApiComparator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint with the fixed feedback instruction and both texts, using the
//! sampling parameters from [`FeedbackSettings`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ApiCredentials, FeedbackSettings};
use crate::feedback::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// ComparisonError
// ---------------------------------------------------------------------------

/// Errors that can occur while requesting feedback.
///
/// Any variant aborts the current pipeline run before anything is displayed.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// HTTP transport or connection error, including non-success statuses.
    #[error("feedback request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("feedback request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse feedback response: {0}")]
    Parse(String),

    /// The service returned a completion with no usable text content.
    #[error("feedback service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ComparisonError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ComparisonError::Timeout
        } else {
            ComparisonError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Comparator trait
// ---------------------------------------------------------------------------

/// Async trait for feedback backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Comparator>`).
///
/// # Arguments
/// * `reference`  – What the speaker intended to say.
/// * `transcript` – What the transcription service heard.
#[async_trait]
pub trait Comparator: Send + Sync {
    async fn compare(&self, reference: &str, transcript: &str)
        -> Result<String, ComparisonError>;
}

// ---------------------------------------------------------------------------
// ApiComparator
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// One request per comparison: a system instruction plus a user message
/// embedding both texts, fixed temperature and output-length cap, a single
/// text completion out.
pub struct ApiComparator {
    client: reqwest::Client,
    settings: FeedbackSettings,
    credentials: ApiCredentials,
    prompt_builder: PromptBuilder,
}

impl ApiComparator {
    /// Build an `ApiComparator` from settings and an explicit credential.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `settings.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn new(settings: &FeedbackSettings, credentials: ApiCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            settings: settings.clone(),
            credentials,
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// The full endpoint URL requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.settings.base_url)
    }
}

#[async_trait]
impl Comparator for ApiComparator {
    /// Send both texts to the configured endpoint and return the first
    /// completion's content unmodified.
    async fn compare(
        &self,
        reference: &str,
        transcript: &str,
    ) -> Result<String, ComparisonError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(reference, transcript);

        let body = serde_json::json!({
            "model":       self.settings.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "temperature": self.settings.temperature,
            "max_tokens":  self.settings.max_tokens
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.credentials.api_key())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ComparisonError::Parse(e.to_string()))?;

        let feedback = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ComparisonError::EmptyResponse)?
            .to_string();

        if feedback.is_empty() {
            return Err(ComparisonError::EmptyResponse);
        }

        Ok(feedback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

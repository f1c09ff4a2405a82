//! API credential resolution.
//!
//! The key is read from the process environment once at startup and passed
//! by value into every API client — there is no ambient global client.

use thiserror::Error;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Errors raised while resolving credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("environment variable {API_KEY_VAR} is not set")]
    Missing,

    #[error("environment variable {API_KEY_VAR} is empty")]
    Empty,
}

/// API credential shared by the transcription and feedback clients.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    api_key: String,
}

impl ApiCredentials {
    /// Resolve the credential from the process environment.
    ///
    /// # Errors
    ///
    /// [`CredentialsError::Missing`] when the variable is unset,
    /// [`CredentialsError::Empty`] when it is set but blank.
    pub fn from_env() -> Result<Self, CredentialsError> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| CredentialsError::Missing)?;
        Self::new(api_key)
    }

    /// Build a credential from an explicit key (useful for tests).
    pub fn new(api_key: impl Into<String>) -> Result<Self, CredentialsError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CredentialsError::Empty);
        }
        Ok(Self { api_key })
    }

    /// The bearer token sent with every API request.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

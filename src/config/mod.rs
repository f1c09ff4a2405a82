//! Configuration module for the speech rehearsal assistant.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform data directories, `ApiCredentials` for the
//! environment-resolved API key, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod credentials;
pub mod paths;
pub mod settings;

pub use credentials::{ApiCredentials, CredentialsError, API_KEY_VAR};
pub use paths::AppPaths;
pub use settings::{AppConfig, AudioSettings, FeedbackSettings, TranscriptionSettings};

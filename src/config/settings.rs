//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioSettings
// ---------------------------------------------------------------------------

/// Settings for the fixed-duration audio capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Recording length in whole seconds. Capture always runs for the full
    /// duration; there is no voice-activity cutoff.
    pub duration_secs: u32,
    /// Sample rate of the recording in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels (2 = stereo).
    pub channels: u16,
    /// Audio input device name — `None` means the system default.
    ///
    /// A configured name that matches no enumerated device is a startup
    /// error, not a silent fallback.
    pub input_device: Option<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            sample_rate: 16_000,
            channels: 2,
            input_device: None,
        }
    }
}

impl AudioSettings {
    /// Total interleaved sample count for a full recording.
    pub fn total_samples(&self) -> usize {
        self.duration_secs as usize * self.sample_rate as usize * self.channels as usize
    }
}

// ---------------------------------------------------------------------------
// TranscriptionSettings
// ---------------------------------------------------------------------------

/// Settings for the remote speech-to-text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Base URL of the OpenAI-compatible API endpoint.
    pub base_url: String,
    /// Model identifier sent with the upload (e.g. `"whisper-1"`).
    pub model: String,
    /// Maximum seconds to wait for a transcription response.
    pub timeout_secs: u64,
    /// Write a newline after each transcript appended to the log.
    ///
    /// `false` reproduces the historical separator-less concatenation.
    pub entry_separator: bool,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "whisper-1".into(),
            timeout_secs: 60,
            entry_separator: true,
        }
    }
}

// ---------------------------------------------------------------------------
// FeedbackSettings
// ---------------------------------------------------------------------------

/// Settings for the remote text-generation service that produces feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSettings {
    /// Base URL of the OpenAI-compatible API endpoint.
    pub base_url: String,
    /// Model identifier sent to the chat-completions API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum completion length in tokens.
    pub max_tokens: u32,
    /// Maximum seconds to wait for a feedback response.
    pub timeout_secs: u64,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4-turbo-preview".into(),
            temperature: 0.7,
            max_tokens: 1500,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use rehearse::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Audio capture settings.
    pub audio: AudioSettings,
    /// Remote transcription settings.
    pub transcription: TranscriptionSettings,
    /// Remote feedback settings.
    pub feedback: FeedbackSettings,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

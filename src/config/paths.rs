//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\rehearse\
//!   macOS:   ~/Library/Application Support/rehearse/
//!   Linux:   ~/.config/rehearse/
//!
//! Data dir (recording slot + transcript log):
//!   Windows: %LOCALAPPDATA%\rehearse\
//!   macOS:   ~/Library/Application Support/rehearse/
//!   Linux:   ~/.local/share/rehearse/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Single-slot WAV file, overwritten on every recording.
    pub recording_file: PathBuf,
    /// Append-only transcript log.
    pub transcript_log: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "rehearse";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let recording_file = data_dir.join("recording.wav");
        let transcript_log = data_dir.join("transcription.txt");

        Self {
            config_dir,
            settings_file,
            recording_file,
            transcript_log,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

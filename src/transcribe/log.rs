//! Append-only transcript log.
//!
//! Every successful transcription is appended to one plain-text file that is
//! never truncated.  Historically entries were concatenated with no
//! separator at all, which makes the log unsplittable; by default a newline
//! is written after each entry.  Setting `entry_separator = false` in the
//! config reproduces the old byte-exact behavior.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Handle to the on-disk transcript log.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
    entry_separator: bool,
}

impl TranscriptLog {
    /// Create a handle for the log at `path`.
    ///
    /// The file itself is created lazily on the first append.
    pub fn new(path: impl Into<PathBuf>, entry_separator: bool) -> Self {
        Self {
            path: path.into(),
            entry_separator,
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one transcript to the log.
    ///
    /// The entry (plus the optional trailing newline) goes out in a single
    /// write so a failure never leaves a half-appended record.  Prior
    /// content is never touched.
    pub fn append(&self, text: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut entry = String::with_capacity(text.len() + 1);
        entry.push_str(text);
        if self.entry_separator {
            entry.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;

        log::debug!(
            "appended {} bytes to transcript log {}",
            entry.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_without_separator_grows_by_exact_length() {
        let dir = tempdir().expect("temp dir");
        let log = TranscriptLog::new(dir.path().join("transcription.txt"), false);

        log.append("hello world").expect("append");

        let content = std::fs::read_to_string(log.path()).expect("read");
        assert_eq!(content, "hello world");
        assert_eq!(content.len(), "hello world".len());
    }

    #[test]
    fn append_with_separator_adds_one_newline() {
        let dir = tempdir().expect("temp dir");
        let log = TranscriptLog::new(dir.path().join("transcription.txt"), true);

        log.append("hello world").expect("append");

        let content = std::fs::read_to_string(log.path()).expect("read");
        assert_eq!(content, "hello world\n");
    }

    #[test]
    fn prior_content_is_untouched() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("transcription.txt");
        std::fs::write(&path, "earlier run").expect("seed");

        let log = TranscriptLog::new(&path, false);
        log.append("hello world").expect("append");

        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content, "earlier runhello world");
    }

    #[test]
    fn log_grows_monotonically_across_appends() {
        let dir = tempdir().expect("temp dir");
        let log = TranscriptLog::new(dir.path().join("transcription.txt"), true);

        log.append("first take").expect("append");
        log.append("second take").expect("append");

        let content = std::fs::read_to_string(log.path()).expect("read");
        assert_eq!(content, "first take\nsecond take\n");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().expect("temp dir");
        let log = TranscriptLog::new(dir.path().join("nested").join("transcription.txt"), true);

        log.append("entry").expect("append");
        assert!(log.path().exists());
    }
}

//! WAV persistence for the single-slot recording file.
//!
//! The buffer is written as 16-bit PCM via `hound`.  The write is
//! all-or-nothing: samples go to a sibling temp file first and the final
//! path is only replaced by an atomic rename, so a failed write never
//! leaves a partial recording behind.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::capture::CaptureError;

/// Convert one `f32` sample in `[-1.0, 1.0]` to 16-bit PCM.
fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Write `samples` (interleaved f32 frames) as a 16-bit PCM WAV at `path`,
/// overwriting any previous recording.
///
/// # Errors
///
/// [`CaptureError::Persist`] on WAV encoding failure, [`CaptureError::Io`]
/// on filesystem failure.  On error the previous file at `path` is left
/// untouched.
pub fn write_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<(), CaptureError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let tmp = path.with_extension("wav.tmp");

    let mut writer = WavWriter::create(&tmp, spec)?;
    for &sample in samples {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()?;

    std::fs::rename(&tmp, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_expected_spec_and_length() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("recording.wav");

        // 3 s of silence, 16 kHz stereo.
        let samples = vec![0.0_f32; 3 * 16_000 * 2];
        write_wav(&path, &samples, 16_000, 2).expect("write");

        let reader = hound::WavReader::open(&path).expect("open");
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, SampleFormat::Int);
        // duration == 3 s exactly (len() counts per-channel samples)
        assert_eq!(reader.len(), 3 * 16_000 * 2);
    }

    #[test]
    fn overwrites_previous_recording() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("recording.wav");

        write_wav(&path, &vec![0.0_f32; 16_000 * 2], 16_000, 2).expect("first write");
        write_wav(&path, &vec![0.0_f32; 2 * 16_000 * 2], 16_000, 2).expect("second write");

        let reader = hound::WavReader::open(&path).expect("open");
        // The slot holds exactly the most recent recording.
        assert_eq!(reader.len(), 2 * 16_000 * 2);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("recording.wav");

        write_wav(&path, &vec![0.5_f32; 1_000], 16_000, 2).expect("write");

        assert!(path.exists());
        assert!(!path.with_extension("wav.tmp").exists());
    }

    #[test]
    fn sample_conversion_clamps() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("deep").join("recording.wav");

        write_wav(&path, &vec![0.0_f32; 64], 16_000, 2).expect("write");
        assert!(path.exists());
    }
}

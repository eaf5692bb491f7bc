//! Audio segment extraction.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

/// Extraction failure for one requested time range.
#[derive(Debug, Error)]
pub enum ClipError {
    /// The range lies outside the recording.
    #[error("range {start_ms}..{end_ms} ms is outside the recording")]
    Unavailable { start_ms: i64, end_ms: i64 },

    /// The recording is not in the layout the roster backend accepts.
    #[error("unsupported audio layout: {0}")]
    Format(String),

    /// WAV read or write failure.
    #[error(transparent)]
    Wav(#[from] hound::Error),
}

/// Provides audio for arbitrary time ranges of the recording under
/// correction.
///
/// Implementations are called from blocking worker threads, many times per
/// run, so extraction should not touch the filesystem per call;
/// [`WavFileSource`] keeps the decoded samples in memory for that reason.
pub trait SegmentSource: Send + Sync {
    /// Returns an encoded WAV clip covering `start_ms..end_ms`.
    fn extract(&self, start_ms: i64, end_ms: i64) -> Result<Vec<u8>, ClipError>;
}

/// In-memory source backed by a mono 16 kHz 16-bit WAV recording.
pub struct WavFileSource {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl WavFileSource {
    /// Reads and validates a WAV file.
    ///
    /// The roster backend scores 16 kHz mono 16-bit PCM; anything else is
    /// rejected here instead of being silently resampled.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClipError> {
        Self::from_reader(WavReader::open(path)?)
    }

    /// Builds a source from raw 16 kHz mono samples.
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self {
            samples,
            sample_rate: 16_000,
        }
    }

    fn from_reader<R: Read>(mut reader: WavReader<R>) -> Result<Self, ClipError> {
        let spec = reader.spec();
        if spec.channels != 1
            || spec.sample_rate != 16_000
            || spec.bits_per_sample != 16
            || spec.sample_format != SampleFormat::Int
        {
            return Err(ClipError::Format(format!(
                "want mono 16 kHz 16-bit PCM, got {} ch {} Hz {}-bit {:?}",
                spec.channels, spec.sample_rate, spec.bits_per_sample, spec.sample_format
            )));
        }
        let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    fn sample_index(&self, ms: i64) -> usize {
        (ms * self.sample_rate as i64 / 1000) as usize
    }
}

impl SegmentSource for WavFileSource {
    fn extract(&self, start_ms: i64, end_ms: i64) -> Result<Vec<u8>, ClipError> {
        if start_ms < 0 || end_ms <= start_ms {
            return Err(ClipError::Unavailable { start_ms, end_ms });
        }
        let start = self.sample_index(start_ms);
        if start >= self.samples.len() {
            return Err(ClipError::Unavailable { start_ms, end_ms });
        }
        // ASR timestamps can overrun the recording tail by a frame; clamp
        // instead of failing.
        let end = self.sample_index(end_ms).min(self.samples.len());

        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in &self.samples[start..end] {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(samples: usize) -> Vec<i16> {
        (0..samples).map(|i| ((i % 80) as i16 - 40) * 100).collect()
    }

    #[test]
    fn extracts_requested_range_as_wav() {
        let source = WavFileSource::from_samples(tone(16_000 * 10));
        let clip = source.extract(2000, 4000).unwrap();
        let reader = WavReader::new(Cursor::new(clip)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);
        // 2 s at 16 kHz.
        assert_eq!(reader.len(), 32_000);
    }

    #[test]
    fn clamps_overrun_to_recording_end() {
        let source = WavFileSource::from_samples(tone(16_000));
        let clip = source.extract(500, 5000).unwrap();
        let reader = WavReader::new(Cursor::new(clip)).unwrap();
        assert_eq!(reader.len(), 8_000);
    }

    #[test]
    fn range_past_the_end_is_unavailable() {
        let source = WavFileSource::from_samples(tone(16_000));
        assert!(matches!(
            source.extract(2000, 3000),
            Err(ClipError::Unavailable { .. })
        ));
    }

    #[test]
    fn degenerate_ranges_are_unavailable() {
        let source = WavFileSource::from_samples(tone(16_000));
        assert!(source.extract(500, 500).is_err());
        assert!(source.extract(500, 400).is_err());
        assert!(source.extract(-100, 400).is_err());
    }

    #[test]
    fn rejects_non_roster_audio_layout() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for sample in tone(100) {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let reader = WavReader::new(Cursor::new(cursor.into_inner())).unwrap();
        assert!(matches!(
            WavFileSource::from_reader(reader),
            Err(ClipError::Format(_))
        ));
    }
}

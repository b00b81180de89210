//! WAVE container framing
//!
//! Wraps 16-bit mono PCM in a RIFF/WAVE container that any PCM-capable audio
//! API can play, and reads such containers back bit-exactly.

use crate::synth::{SampleBuffer, MAX_SAMPLE_COUNT};
use crate::{MorseError, Result};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// Channel count of every generated signal
pub const CHANNELS: u16 = 1;

/// Bytes per encoded sample
pub const BYTES_PER_SAMPLE: u16 = 2;

/// Playable WAVE data
///
/// The bytes are shared, so clones are cheap and can be handed to any number
/// of playback workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Arc<[u8]>,
    sample_rate: u32,
    sample_count: usize,
}

impl EncodedAudio {
    /// Validate and wrap existing WAVE bytes
    pub fn from_wav_bytes(bytes: Vec<u8>) -> Result<Self> {
        let (spec, sample_count) = {
            let reader = hound::WavReader::new(Cursor::new(bytes.as_slice()))
                .map_err(|e| MorseError::Decode(format!("Failed to read WAV header: {}", e)))?;
            (reader.spec(), reader.duration() as usize)
        };
        check_format(&spec)?;

        Ok(Self {
            bytes: bytes.into(),
            sample_rate: spec.sample_rate,
            sample_count,
        })
    }

    /// Complete container bytes (header and payload)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Container size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if there are no bytes at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sample rate declared in the header
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples in the payload
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Nominal playback length
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.sample_count as f64 / self.sample_rate as f64)
    }

    /// Byte length declared by the `data` chunk header, if present
    pub fn declared_data_len(&self) -> Option<u32> {
        find_chunk(&self.bytes, b"data").map(|(len, _)| len)
    }
}

impl AsRef<[u8]> for EncodedAudio {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encode a buffer as mono 16-bit WAVE at the buffer's own sample rate
///
/// # Errors
/// `MorseError::EmptyBuffer` for a buffer with no samples.
pub fn encode(buffer: &SampleBuffer) -> Result<EncodedAudio> {
    encode_with(
        buffer.samples(),
        buffer.sample_rate(),
        CHANNELS,
        BYTES_PER_SAMPLE,
    )
}

/// Encode raw samples with explicit framing parameters
///
/// Only mono, 2-byte framing is produced; anything else is rejected with
/// `MorseError::ConfigError`.
pub fn encode_with(
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
    bytes_per_sample: u16,
) -> Result<EncodedAudio> {
    if samples.is_empty() {
        return Err(MorseError::EmptyBuffer);
    }
    if channels != CHANNELS {
        return Err(MorseError::ConfigError(format!(
            "only mono output is supported, got {} channels",
            channels
        )));
    }
    if bytes_per_sample != BYTES_PER_SAMPLE {
        return Err(MorseError::ConfigError(format!(
            "only 16-bit samples are supported, got {} bytes per sample",
            bytes_per_sample
        )));
    }
    if sample_rate == 0 {
        return Err(MorseError::ConfigError("sample rate must be positive".to_string()));
    }
    if samples.len() > MAX_SAMPLE_COUNT {
        return Err(MorseError::Encode(format!(
            "{} samples do not fit a WAVE data chunk",
            samples.len()
        )));
    }

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bytes_per_sample * 8,
        sample_format: hound::SampleFormat::Int,
    };

    let payload_len = samples.len() * bytes_per_sample as usize;
    let mut cursor = Cursor::new(Vec::with_capacity(payload_len + 44));
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| encode_error("Failed to create WAV writer", e))?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| encode_error("Failed to write sample", e))?;
    }

    writer
        .finalize()
        .map_err(|e| encode_error("Failed to finalize WAV data", e))?;

    Ok(EncodedAudio {
        bytes: cursor.into_inner().into(),
        sample_rate,
        sample_count: samples.len(),
    })
}

/// Read mono 16-bit WAVE bytes back into a sample buffer
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| MorseError::Decode(format!("Failed to read WAV header: {}", e)))?;
    let spec = reader.spec();
    check_format(&spec)?;

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MorseError::Decode(format!("Failed to read samples: {}", e)))?;

    Ok(SampleBuffer::new(samples, spec.sample_rate))
}

fn encode_error(context: &str, err: hound::Error) -> MorseError {
    MorseError::Encode(format!("{}: {}", context, err))
}

fn check_format(spec: &hound::WavSpec) -> Result<()> {
    if spec.channels != CHANNELS
        || spec.bits_per_sample != BYTES_PER_SAMPLE * 8
        || spec.sample_format != hound::SampleFormat::Int
    {
        return Err(MorseError::Decode(format!(
            "expected mono 16-bit PCM, got {} channel(s), {} bits, {:?}",
            spec.channels, spec.bits_per_sample, spec.sample_format
        )));
    }
    Ok(())
}

/// Locate a RIFF sub-chunk, returning its declared length and body offset
fn find_chunk(bytes: &[u8], id: &[u8; 4]) -> Option<(u32, usize)> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }
    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let len = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().ok()?);
        if &bytes[pos..pos + 4] == id {
            return Some((len, pos + 8));
        }
        // Chunks are word aligned
        pos += 8 + len as usize + (len as usize & 1);
    }
    None
}

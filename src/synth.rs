//! Tone synthesis
//!
//! Renders a fixed-frequency sine tone into signed 16-bit PCM. The tone
//! starts and stops abruptly (no fade), so short signals carry an audible
//! edge click.

use crate::{MorseError, Result};
use std::f64::consts::PI;
use std::time::Duration;

/// Default sample rate used for generated signals
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default peak amplitude (fraction of full scale)
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// Largest sample count whose 16-bit payload still fits a RIFF data chunk
pub const MAX_SAMPLE_COUNT: usize = (u32::MAX as usize - 44) / 2;

/// Full-scale value of a signed 16-bit sample
const FULL_SCALE: f64 = i16::MAX as f64;

/// Parameters that fully determine a tone buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Tone frequency in Hz
    pub frequency: f64,
    /// Tone length in seconds
    pub duration: f64,
    /// Samples per second
    pub sample_rate: u32,
    /// Peak amplitude in (0, 1]
    pub amplitude: f64,
}

impl ToneSpec {
    /// Create a tone spec with the default sample rate and amplitude
    pub fn new(frequency: f64, duration: f64) -> Self {
        Self {
            frequency,
            duration,
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }

    /// Override the sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Override the amplitude
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Number of samples this spec renders to: `round(sample_rate * duration)`
    pub fn sample_count(&self) -> usize {
        (self.sample_rate as f64 * self.duration).round() as usize
    }

    /// Check every parameter range
    pub fn validate(&self) -> Result<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(MorseError::InvalidToneSpec(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(MorseError::InvalidToneSpec(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if self.sample_rate == 0 {
            return Err(MorseError::InvalidToneSpec(
                "sample rate must be positive".to_string(),
            ));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(MorseError::InvalidToneSpec(format!(
                "amplitude must be in (0, 1], got {}",
                self.amplitude
            )));
        }
        if self.sample_rate as f64 * self.duration > MAX_SAMPLE_COUNT as f64 {
            return Err(MorseError::InvalidToneSpec(format!(
                "duration {}s at {} Hz exceeds {} samples",
                self.duration, self.sample_rate, MAX_SAMPLE_COUNT
            )));
        }
        if self.sample_count() == 0 {
            return Err(MorseError::InvalidToneSpec(format!(
                "duration {}s is shorter than one sample at {} Hz",
                self.duration, self.sample_rate
            )));
        }
        Ok(())
    }
}

/// Signed 16-bit PCM samples at a known sample rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap raw samples
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Sample data in playback order
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Consume the buffer, returning the raw samples
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Real-time length of the buffer
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Render a sine tone
///
/// Sample `i` is `amplitude * 32767 * sin(2π * frequency * i / sample_rate)`,
/// truncated toward zero. Identical specs always yield identical buffers.
///
/// # Errors
/// `MorseError::InvalidToneSpec` if any parameter is out of range; no buffer
/// is produced in that case.
pub fn synthesize(spec: &ToneSpec) -> Result<SampleBuffer> {
    spec.validate()?;

    let step = 2.0 * PI * spec.frequency / spec.sample_rate as f64;
    let scale = spec.amplitude * FULL_SCALE;

    let samples = (0..spec.sample_count())
        .map(|i| (scale * (step * i as f64).sin()) as i16)
        .collect();

    Ok(SampleBuffer::new(samples, spec.sample_rate))
}

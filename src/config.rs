//! Tone configuration
//!
//! All signal parameters are fixed at startup; an invalid configuration is a
//! startup error, never a per-key-press one.

use crate::synth::{ToneSpec, DEFAULT_AMPLITUDE, DEFAULT_SAMPLE_RATE};
use crate::{MorseError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default tone frequency (Hz)
pub const DEFAULT_FREQUENCY: f64 = 800.0;
/// Default dit length (seconds)
pub const DEFAULT_DIT_DURATION: f64 = 0.1;
/// Default dah length (seconds)
pub const DEFAULT_DAH_DURATION: f64 = 0.3;
/// Default silence after each symbol (milliseconds)
pub const DEFAULT_SYMBOL_GAP_MS: u64 = 100;

const MAX_SYMBOL_GAP_MS: u64 = 10_000;

/// Startup configuration for the two Morse signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Tone frequency shared by dit and dah (Hz)
    pub frequency: f64,
    /// Dit length (seconds)
    pub dit_duration: f64,
    /// Dah length (seconds)
    pub dah_duration: f64,
    /// Output sample rate (Hz)
    pub sample_rate: u32,
    /// Peak amplitude in (0, 1]
    pub amplitude: f64,
    /// Silence inserted after every symbol (milliseconds)
    pub symbol_gap_ms: u64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            dit_duration: DEFAULT_DIT_DURATION,
            dah_duration: DEFAULT_DAH_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: DEFAULT_AMPLITUDE,
            symbol_gap_ms: DEFAULT_SYMBOL_GAP_MS,
        }
    }
}

impl ToneConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ToneConfig = serde_json::from_str(json)
            .map_err(|e| MorseError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Tone spec for a dit
    pub fn dit_spec(&self) -> ToneSpec {
        self.spec(self.dit_duration)
    }

    /// Tone spec for a dah
    pub fn dah_spec(&self) -> ToneSpec {
        self.spec(self.dah_duration)
    }

    /// Silence inserted after every symbol
    pub fn symbol_gap(&self) -> Duration {
        Duration::from_millis(self.symbol_gap_ms)
    }

    /// Check both tone specs and the gap
    pub fn validate(&self) -> Result<()> {
        self.dit_spec().validate()?;
        self.dah_spec().validate()?;
        if self.symbol_gap_ms > MAX_SYMBOL_GAP_MS {
            return Err(MorseError::ConfigError(format!(
                "symbol gap {}ms exceeds {}ms",
                self.symbol_gap_ms, MAX_SYMBOL_GAP_MS
            )));
        }
        Ok(())
    }

    fn spec(&self, duration: f64) -> ToneSpec {
        ToneSpec::new(self.frequency, duration)
            .with_sample_rate(self.sample_rate)
            .with_amplitude(self.amplitude)
    }
}

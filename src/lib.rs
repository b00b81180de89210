//! Morse code keyboard trainer
//!
//! Synthesizes the two Morse signals (dit and dah) as 16-bit PCM, frames them
//! as mono WAVE data, and plays symbol sequences on background workers so the
//! event thread that dispatched a key press never waits on audio.
//!
//! # Features
//! - Deterministic sine-tone synthesis with fixed-point quantization
//! - Bit-exact RIFF/WAVE encoding and decoding via `hound`
//! - Precomputed, lock-free shared signal bank for DIT/DAH
//! - One background worker per key press with observable completion
//! - Pluggable playback engine (silent engine, or rodio device output)
//!
//! # Crate feature flags
//! - `streaming` (opt-in): Real-time audio output (enables optional `rodio` dep)
//!
//! # Quick start
//! ```no_run
//! use std::sync::Arc;
//! use morsekey::{ChannelListener, NullEngine, PlaybackRequest, PlaybackSequencer, SignalBank, ToneConfig};
//!
//! let config = ToneConfig::default();
//! let bank = Arc::new(SignalBank::build(&config).unwrap());
//! let sequencer = PlaybackSequencer::new(Arc::new(NullEngine), bank, config.symbol_gap());
//!
//! let (listener, events) = ChannelListener::new();
//! let request = PlaybackRequest::for_key('k').unwrap();
//! let task = sequencer.play(request, Arc::new(listener)).unwrap();
//! task.join().unwrap();
//! assert_eq!(events.try_iter().count(), 2);
//! ```

#![warn(missing_docs)]

pub mod config; // Tone configuration
pub mod morse; // Character table and playback requests
pub mod sequencer; // Background playback sequencing
pub mod signals; // Precomputed DIT/DAH audio
pub mod streaming; // Playback engines
pub mod synth; // Tone synthesis
pub mod wav; // WAVE container framing

/// Error types for Morse signal generation and playback
#[derive(thiserror::Error, Debug)]
pub enum MorseError {
    /// Tone synthesis parameters out of range
    #[error("Invalid tone spec: {0}")]
    InvalidToneSpec(String),

    /// Encoder was handed a buffer with no samples
    #[error("Cannot encode an empty sample buffer")]
    EmptyBuffer,

    /// Audio device failed to load or play a buffer
    #[error("Playback device error: {0}")]
    PlaybackDevice(String),

    /// WAVE container could not be written
    #[error("Encode error: {0}")]
    Encode(String),

    /// Malformed WAVE data
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// IO error from filesystem or thread spawning
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for MorseError {
    /// Converts a String into `MorseError::Other`.
    ///
    /// Prefer the explicit variants (`InvalidToneSpec`, `PlaybackDevice`, ...)
    /// where the failure has a known category.
    fn from(msg: String) -> Self {
        MorseError::Other(msg)
    }
}

impl From<&str> for MorseError {
    fn from(msg: &str) -> Self {
        MorseError::Other(msg.to_string())
    }
}

/// Result type for Morse audio operations
pub type Result<T> = std::result::Result<T, MorseError>;

// Public API exports
pub use config::ToneConfig;
pub use morse::{lookup, PlaybackRequest, KEYBOARD_ROWS};
pub use sequencer::{
    ChannelListener, PlaybackListener, PlaybackReport, PlaybackSequencer, PlaybackTask,
    SequencerEvent,
};
pub use signals::{MorseSymbol, SignalBank};
#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, RodioEngine};
pub use streaming::{NullEngine, PlaybackEngine};
pub use synth::{synthesize, SampleBuffer, ToneSpec};
pub use wav::{decode, encode, EncodedAudio};

//! Playback engines
//!
//! The sequencer only needs two things from the host audio system: turning
//! encoded audio into something playable, and starting playback without
//! waiting for it to finish. Waiting is the caller's job.

use crate::wav::EncodedAudio;
use crate::Result;
use std::time::Duration;

#[cfg(feature = "streaming")]
pub mod audio_device;

#[cfg(feature = "streaming")]
pub use audio_device::{AudioDevice, RodioEngine};

/// Host audio capability used by the playback sequencer
///
/// Implementations are shared across playback workers, so they must be
/// `Send + Sync`. Device failures are reported as
/// [`MorseError::PlaybackDevice`](crate::MorseError::PlaybackDevice).
pub trait PlaybackEngine: Send + Sync {
    /// A loaded, ready-to-start sound
    type Handle: Send;

    /// Prepare encoded audio for playback
    fn load(&self, audio: &EncodedAudio) -> Result<Self::Handle>;

    /// Start playback and return immediately with the sound's nominal length
    fn play(&self, handle: Self::Handle) -> Result<Duration>;
}

/// Engine that produces no sound but reports real durations
///
/// Keeps sequencing timing identical to a real device; used when no output
/// device is available or playback is muted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEngine;

impl PlaybackEngine for NullEngine {
    type Handle = Duration;

    fn load(&self, audio: &EncodedAudio) -> Result<Duration> {
        Ok(audio.duration())
    }

    fn play(&self, handle: Duration) -> Result<Duration> {
        Ok(handle)
    }
}

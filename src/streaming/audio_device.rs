//! Audio device integration using rodio
//!
//! [`AudioDevice`] owns the output stream. The stream is tied to the thread
//! that opened it, so workers get a [`RodioEngine`] instead: a cloneable
//! handle onto the device mixer that stops working once the device is
//! dropped.

use super::PlaybackEngine;
use crate::wav::EncodedAudio;
use crate::{MorseError, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};
use std::io::Cursor;
use std::time::Duration;

/// System audio output
///
/// Opening the device initialises the host audio backend; dropping it tears
/// the stream down. Keep it alive for as long as anything should be heard.
pub struct AudioDevice {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioDevice {
    /// Open the default output device
    pub fn open() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            MorseError::PlaybackDevice(format!("Failed to create audio stream: {}", e))
        })?;
        log::info!("audio output device opened");

        Ok(AudioDevice {
            _stream: stream,
            handle,
        })
    }

    /// Engine handle for playback workers
    pub fn engine(&self) -> RodioEngine {
        RodioEngine {
            handle: self.handle.clone(),
        }
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        log::debug!("audio output device closed");
    }
}

/// Playback engine backed by an [`AudioDevice`] mixer
#[derive(Clone)]
pub struct RodioEngine {
    handle: OutputStreamHandle,
}

/// Decoded sound waiting to be started
pub struct LoadedSound {
    decoder: Decoder<Cursor<EncodedAudio>>,
    duration: Duration,
}

impl PlaybackEngine for RodioEngine {
    type Handle = LoadedSound;

    fn load(&self, audio: &EncodedAudio) -> Result<LoadedSound> {
        let decoder = Decoder::new(Cursor::new(audio.clone())).map_err(|e| {
            MorseError::PlaybackDevice(format!("Failed to decode signal: {}", e))
        })?;
        Ok(LoadedSound {
            decoder,
            duration: audio.duration(),
        })
    }

    fn play(&self, sound: LoadedSound) -> Result<Duration> {
        // Each sound is an independent one-shot voice on the mixer
        self.handle
            .play_raw(sound.decoder.convert_samples())
            .map_err(|e| MorseError::PlaybackDevice(format!("Failed to start playback: {}", e)))?;
        Ok(sound.duration)
    }
}

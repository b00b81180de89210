//! Background playback sequencing
//!
//! Every key press becomes one [`PlaybackRequest`] run on its own worker
//! thread. Within a run symbols play strictly in order with a fixed silence
//! after each one; separate runs are independent and may overlap audibly.
//! Runs cannot be cancelled once started.
//!
//! The worker waits for each sound's *nominal* length as reported by the
//! engine, not for a completion signal from the device. Under heavy load the
//! real device timing can drift from this.

use crate::morse::PlaybackRequest;
use crate::signals::{MorseSymbol, SignalBank};
use crate::streaming::PlaybackEngine;
use crate::{MorseError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Lifecycle notification for one playback run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Run started; highlight the key
    Started(char),
    /// A symbol failed to play; the rest of the run was dropped
    Failed {
        /// Key of the failed run
        key: char,
        /// Error description
        error: String,
    },
    /// Run finished (successfully or not); reset the highlight
    Completed(char),
}

/// Receives lifecycle callbacks from playback workers
///
/// Callbacks run on the worker thread, never on the thread that called
/// [`PlaybackSequencer::play`].
pub trait PlaybackListener: Send + Sync {
    /// Called once before the first symbol
    fn on_start(&self, key: char);

    /// Called once after the last symbol, even after a failure
    fn on_complete(&self, key: char);

    /// Called when the engine fails; remaining symbols are skipped
    fn on_error(&self, _key: char, _error: &MorseError) {}
}

/// Listener that forwards events over a channel to the UI thread
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<SequencerEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiving end for the UI
    pub fn new() -> (Self, Receiver<SequencerEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    /// Forward into an existing channel
    pub fn with_sender(sender: Sender<SequencerEvent>) -> Self {
        Self { sender }
    }

    fn send(&self, event: SequencerEvent) {
        // A UI that stopped listening must not take the worker down with it
        if self.sender.send(event).is_err() {
            log::debug!("sequencer event dropped, receiver gone");
        }
    }
}

impl PlaybackListener for ChannelListener {
    fn on_start(&self, key: char) {
        self.send(SequencerEvent::Started(key));
    }

    fn on_complete(&self, key: char) {
        self.send(SequencerEvent::Completed(key));
    }

    fn on_error(&self, key: char, error: &MorseError) {
        self.send(SequencerEvent::Failed {
            key,
            error: error.to_string(),
        });
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Key of the run
    pub key: char,
    /// Number of symbols that were played
    pub symbols_played: usize,
}

/// Handle to a spawned run
///
/// Dropping the handle detaches the worker; the run still completes.
#[derive(Debug)]
pub struct PlaybackTask {
    key: char,
    handle: JoinHandle<Result<PlaybackReport>>,
}

impl PlaybackTask {
    /// Key of the run
    pub fn key(&self) -> char {
        self.key
    }

    /// True once the worker has returned
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run and return its outcome
    pub fn join(self) -> Result<PlaybackReport> {
        let key = self.key;
        self.handle
            .join()
            .map_err(|_| MorseError::Other(format!("playback worker for {:?} panicked", key)))?
    }
}

/// Plays symbol sequences through a [`PlaybackEngine`]
pub struct PlaybackSequencer<E> {
    engine: Arc<E>,
    bank: Arc<SignalBank>,
    symbol_gap: Duration,
}

impl<E> Clone for PlaybackSequencer<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            bank: Arc::clone(&self.bank),
            symbol_gap: self.symbol_gap,
        }
    }
}

impl<E: PlaybackEngine + 'static> PlaybackSequencer<E> {
    /// Create a sequencer over a shared engine and signal bank
    pub fn new(engine: Arc<E>, bank: Arc<SignalBank>, symbol_gap: Duration) -> Self {
        Self {
            engine,
            bank,
            symbol_gap,
        }
    }

    /// Silence inserted after each symbol
    pub fn symbol_gap(&self) -> Duration {
        self.symbol_gap
    }

    /// Play a request on a new background worker
    ///
    /// Returns as soon as the worker is spawned. The only error is a failure
    /// to spawn; playback failures are delivered to the listener and through
    /// [`PlaybackTask::join`].
    pub fn play(
        &self,
        request: PlaybackRequest,
        listener: Arc<dyn PlaybackListener>,
    ) -> Result<PlaybackTask> {
        let key = request.key;
        let sequencer = self.clone();
        let handle = thread::Builder::new()
            .name(format!("morse-{}", key.escape_default()))
            .spawn(move || sequencer.run(request, listener.as_ref()))?;

        Ok(PlaybackTask { key, handle })
    }

    /// Play a request on the calling thread, blocking until it is done
    pub fn run(
        &self,
        request: PlaybackRequest,
        listener: &dyn PlaybackListener,
    ) -> Result<PlaybackReport> {
        let key = request.key;
        listener.on_start(key);

        let mut symbols_played = 0;
        let outcome = self.play_symbols(&request.symbols, &mut symbols_played);

        if let Err(err) = &outcome {
            log::warn!(
                "playback of {:?} aborted after {} of {} symbols: {}",
                key,
                symbols_played,
                request.symbols.len(),
                err
            );
            listener.on_error(key, err);
        }
        listener.on_complete(key);

        outcome.map(|()| PlaybackReport {
            key,
            symbols_played,
        })
    }

    fn play_symbols(&self, symbols: &[MorseSymbol], played: &mut usize) -> Result<()> {
        for &symbol in symbols {
            let sound = self.engine.load(self.bank.get(symbol))?;
            let length = self.engine.play(sound)?;
            log::debug!("{} playing for {:?}", symbol, length);

            thread::sleep(length);
            thread::sleep(self.symbol_gap);
            *played += 1;
        }
        Ok(())
    }
}

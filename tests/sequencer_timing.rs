use std::sync::Arc;
use std::time::{Duration, Instant};

use morsekey::{
    ChannelListener, EncodedAudio, MorseError, MorseSymbol, PlaybackEngine, PlaybackListener,
    PlaybackRequest, PlaybackSequencer, SequencerEvent, SignalBank, ToneConfig,
};
use parking_lot::Mutex;

/// One engine call: when it started, what it played, how long it lasts
#[derive(Debug, Clone, Copy)]
struct PlayRecord {
    started: Instant,
    samples: usize,
    length: Duration,
}

#[derive(Default)]
struct TimingEngine {
    calls: Mutex<Vec<PlayRecord>>,
}

impl PlaybackEngine for TimingEngine {
    type Handle = EncodedAudio;

    fn load(&self, audio: &EncodedAudio) -> morsekey::Result<EncodedAudio> {
        Ok(audio.clone())
    }

    fn play(&self, audio: EncodedAudio) -> morsekey::Result<Duration> {
        let record = PlayRecord {
            started: Instant::now(),
            samples: audio.sample_count(),
            length: audio.duration(),
        };
        self.calls.lock().push(record);
        Ok(record.length)
    }
}

/// Engine that refuses buffers of one size and plays everything else
struct SelectiveEngine {
    reject_samples: usize,
    inner: TimingEngine,
}

impl PlaybackEngine for SelectiveEngine {
    type Handle = EncodedAudio;

    fn load(&self, audio: &EncodedAudio) -> morsekey::Result<EncodedAudio> {
        Ok(audio.clone())
    }

    fn play(&self, audio: EncodedAudio) -> morsekey::Result<Duration> {
        if audio.sample_count() == self.reject_samples {
            return Err(MorseError::PlaybackDevice("buffer rejected".to_string()));
        }
        self.inner.play(audio)
    }
}

/// Engine whose device is gone
struct DeadEngine;

impl PlaybackEngine for DeadEngine {
    type Handle = ();

    fn load(&self, _audio: &EncodedAudio) -> morsekey::Result<()> {
        Err(MorseError::PlaybackDevice("no output device".to_string()))
    }

    fn play(&self, _handle: ()) -> morsekey::Result<Duration> {
        unreachable!("load never succeeds")
    }
}

/// Listener that stores callbacks in arrival order
#[derive(Default)]
struct RecordingListener {
    calls: Mutex<Vec<String>>,
}

impl PlaybackListener for RecordingListener {
    fn on_start(&self, key: char) {
        self.calls.lock().push(format!("start {}", key));
    }

    fn on_complete(&self, key: char) {
        self.calls.lock().push(format!("complete {}", key));
    }

    fn on_error(&self, key: char, _error: &MorseError) {
        self.calls.lock().push(format!("error {}", key));
    }
}

fn reference_sequencer<E: PlaybackEngine + 'static>(engine: Arc<E>) -> PlaybackSequencer<E> {
    let config = ToneConfig::default();
    let bank = Arc::new(SignalBank::build(&config).expect("default config is valid"));
    PlaybackSequencer::new(engine, bank, config.symbol_gap())
}

#[test]
fn empty_sequence_fires_both_callbacks_without_sound() {
    let engine = Arc::new(TimingEngine::default());
    let sequencer = reference_sequencer(Arc::clone(&engine));
    let listener = Arc::new(RecordingListener::default());

    let task = sequencer
        .play(PlaybackRequest::new('X', Vec::new()), listener.clone())
        .unwrap();
    let report = task.join().unwrap();

    assert_eq!(report.symbols_played, 0);
    assert!(engine.calls.lock().is_empty());
    assert_eq!(*listener.calls.lock(), vec!["start X", "complete X"]);
}

#[test]
fn dit_then_dah_with_silence_between() {
    let engine = Arc::new(TimingEngine::default());
    let sequencer = reference_sequencer(Arc::clone(&engine));
    let listener = Arc::new(RecordingListener::default());

    let request = PlaybackRequest::new('A', vec![MorseSymbol::Dit, MorseSymbol::Dah]);
    sequencer.play(request, listener.clone()).unwrap().join().unwrap();

    let calls = engine.calls.lock().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].samples, 4410);
    assert_eq!(calls[1].samples, 13230);

    let first_end = calls[0].started + calls[0].length;
    let gap = calls[1].started.duration_since(first_end);
    assert!(gap >= Duration::from_millis(100), "gap was {:?}", gap);

    assert_eq!(*listener.calls.lock(), vec!["start A", "complete A"]);
}

#[test]
fn device_failure_still_completes() {
    let sequencer = reference_sequencer(Arc::new(DeadEngine));
    let listener = Arc::new(RecordingListener::default());

    let task = sequencer
        .play(PlaybackRequest::for_key('s').unwrap(), listener.clone())
        .unwrap();

    assert!(matches!(task.join(), Err(MorseError::PlaybackDevice(_))));
    assert_eq!(
        *listener.calls.lock(),
        vec!["start S", "error S", "complete S"]
    );
}

#[test]
fn concurrent_runs_are_independent() {
    let engine = Arc::new(TimingEngine::default());
    let sequencer = reference_sequencer(Arc::clone(&engine));
    let (listener, events) = ChannelListener::new();
    let listener: Arc<dyn PlaybackListener> = Arc::new(listener);

    let tasks: Vec<_> = ['T', 'M', 'O']
        .into_iter()
        .map(|key| {
            sequencer
                .play(PlaybackRequest::for_key(key).unwrap(), Arc::clone(&listener))
                .unwrap()
        })
        .collect();

    let played: usize = tasks
        .into_iter()
        .map(|task| task.join().unwrap().symbols_played)
        .sum();

    assert_eq!(played, 1 + 2 + 3);
    let mut calls = engine.calls.lock().clone();
    assert_eq!(calls.len(), 6);

    // Each run's first dah starts before any single dah has finished
    calls.sort_by_key(|call| call.started);
    let spread = calls[2].started.duration_since(calls[0].started);
    assert!(spread < calls[0].length, "runs were serialized: {:?}", spread);

    let events: Vec<_> = events.try_iter().collect();
    for key in ['T', 'M', 'O'] {
        assert!(events.contains(&SequencerEvent::Started(key)));
        assert!(events.contains(&SequencerEvent::Completed(key)));
    }
}

#[test]
fn device_failure_aborts_only_its_own_run() {
    let engine = Arc::new(SelectiveEngine {
        reject_samples: 4410,
        inner: TimingEngine::default(),
    });
    let sequencer = reference_sequencer(Arc::clone(&engine));
    let dahs = Arc::new(RecordingListener::default());
    let dits = Arc::new(RecordingListener::default());

    // 'O' is three dahs, 'E' a single dit the engine refuses
    let long_run = sequencer
        .play(PlaybackRequest::for_key('o').unwrap(), dahs.clone())
        .unwrap();
    let failing_run = sequencer
        .play(PlaybackRequest::for_key('e').unwrap(), dits.clone())
        .unwrap();

    assert!(matches!(
        failing_run.join(),
        Err(MorseError::PlaybackDevice(_))
    ));
    assert_eq!(*dits.calls.lock(), vec!["start E", "error E", "complete E"]);
    assert!(!long_run.is_finished());

    let report = long_run.join().unwrap();
    assert_eq!(report.key, 'O');
    assert_eq!(report.symbols_played, 3);
    assert_eq!(*dahs.calls.lock(), vec!["start O", "complete O"]);

    let calls = engine.inner.calls.lock();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|call| call.samples == 13230));
}

#[test]
fn shared_bank_matches_fresh_synthesis() {
    let config = ToneConfig::default();
    let bank = SignalBank::build(&config).unwrap();

    let fresh = morsekey::synthesize(&config.dah_spec()).unwrap();
    let decoded = morsekey::decode(bank.get(MorseSymbol::Dah).as_bytes()).unwrap();
    assert_eq!(decoded, fresh);
}

//! Terminal Morse keyboard trainer.
//!
//! Every typed character is echoed as Morse code and played as dit/dah tones
//! on a background worker while the key is shown as highlighted.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crossbeam_channel::Receiver;

use morsekey::morse::{self, KEYBOARD_ROWS};
use morsekey::{
    ChannelListener, NullEngine, PlaybackEngine, PlaybackListener, PlaybackRequest,
    PlaybackSequencer, PlaybackTask, SequencerEvent, SignalBank, ToneConfig,
};

#[derive(Parser, Debug)]
#[command(name = "morsekey")]
#[command(about = "Type text, see and hear it in Morse code")]
struct Args {
    /// JSON tone configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tone frequency in Hz
    #[arg(long)]
    frequency: Option<f64>,

    /// Dit length in seconds
    #[arg(long)]
    dit: Option<f64>,

    /// Dah length in seconds
    #[arg(long)]
    dah: Option<f64>,

    /// Output sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Silence after each symbol in milliseconds
    #[arg(long)]
    gap_ms: Option<u64>,

    /// Do not open an audio device (timing is kept)
    #[arg(long)]
    mute: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Play this text one character at a time and exit
    text: Option<String>,
}

impl Args {
    fn tone_config(&self) -> Result<ToneConfig> {
        let mut config = match &self.config {
            Some(path) => ToneConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ToneConfig::default(),
        };

        if let Some(frequency) = self.frequency {
            config.frequency = frequency;
        }
        if let Some(dit) = self.dit {
            config.dit_duration = dit;
        }
        if let Some(dah) = self.dah {
            config.dah_duration = dah;
        }
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(gap_ms) = self.gap_ms {
            config.symbol_gap_ms = gap_ms;
        }

        config.validate().context("Invalid tone configuration")?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Morse rendering of everything typed so far
#[derive(Default)]
struct MorseDisplay {
    text: String,
}

impl MorseDisplay {
    fn push(&mut self, code: &str) {
        self.text.push_str(code);
        self.text.push(' ');
    }

    fn delete_last(&mut self) {
        self.text.pop();
    }
}

/// Front end state: owns the display, the event receiver and running tasks
struct Session<E> {
    sequencer: PlaybackSequencer<E>,
    listener: Arc<dyn PlaybackListener>,
    events: Receiver<SequencerEvent>,
    display: MorseDisplay,
    tasks: Vec<PlaybackTask>,
}

impl<E: PlaybackEngine + 'static> Session<E> {
    fn new(sequencer: PlaybackSequencer<E>) -> Self {
        let (listener, events) = ChannelListener::new();
        Self {
            sequencer,
            listener: Arc::new(listener),
            events,
            display: MorseDisplay::default(),
            tasks: Vec::new(),
        }
    }

    /// Handle one key press; returns the spawned task, if any
    fn press(&mut self, c: char) -> Result<Option<PlaybackTask>> {
        if morse::is_delete(c) {
            self.display.delete_last();
            return Ok(None);
        }
        let Some(request) = PlaybackRequest::for_key(c) else {
            log::debug!("ignoring key {:?}", c);
            return Ok(None);
        };

        self.display.push(morse::lookup(c).unwrap_or_default());
        println!("{}", self.display.text);

        let task = self
            .sequencer
            .play(request, Arc::clone(&self.listener))
            .context("Failed to start playback worker")?;
        Ok(Some(task))
    }

    fn show_events(&self) {
        for event in self.events.try_iter() {
            match event {
                SequencerEvent::Started(key) => println!("  [{}]", key),
                SequencerEvent::Completed(key) => log::debug!("released {:?}", key),
                SequencerEvent::Failed { key, error } => {
                    eprintln!("  [{}] dropped: {}", key, error)
                }
            }
        }
    }

    fn reap(&mut self) {
        let (done, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.is_finished());
        self.tasks = pending;
        for task in done {
            let key = task.key();
            if let Err(err) = task.join() {
                log::debug!("run for {:?} ended with: {}", key, err);
            }
        }
    }

    /// Wait for every outstanding run
    fn join_all(&mut self) {
        for task in self.tasks.drain(..) {
            let key = task.key();
            if let Err(err) = task.join() {
                log::debug!("run for {:?} ended with: {}", key, err);
            }
        }
        self.show_events();
    }

    fn play_text(mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            if let Some(task) = self.press(c)? {
                // A typist waits for each character before the next
                self.tasks.push(task);
                self.join_all();
            }
        }
        Ok(())
    }

    fn interactive(mut self) -> Result<()> {
        print_keyboard();
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read input")?;
            for c in line.chars() {
                if let Some(task) = self.press(c)? {
                    self.tasks.push(task);
                }
            }
            self.show_events();
            self.reap();
            io::stdout().flush().ok();
        }
        self.join_all();
        Ok(())
    }
}

fn print_keyboard() {
    for row in KEYBOARD_ROWS {
        let keys: Vec<String> = row
            .chars()
            .map(|c| format!("{} {:<6}", c, morse::lookup(c).unwrap_or_default()))
            .collect();
        println!("{}", keys.join(" "));
    }
    println!("Type text and press Enter (Ctrl-D to quit).");
}

fn run<E: PlaybackEngine + 'static>(
    args: &Args,
    config: &ToneConfig,
    bank: Arc<SignalBank>,
    engine: Arc<E>,
) -> Result<()> {
    let session = Session::new(PlaybackSequencer::new(engine, bank, config.symbol_gap()));
    match &args.text {
        Some(text) => session.play_text(text),
        None => session.interactive(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.tone_config()?;
    let bank = Arc::new(SignalBank::build(&config).context("Failed to build signals")?);

    #[cfg(feature = "streaming")]
    {
        if !args.mute {
            match morsekey::AudioDevice::open() {
                Ok(device) => {
                    let engine = Arc::new(device.engine());
                    // Device must outlive every worker
                    let result = run(&args, &config, bank, engine);
                    drop(device);
                    return result;
                }
                Err(err) => log::warn!("{}; continuing without sound", err),
            }
        }
    }

    #[cfg(not(feature = "streaming"))]
    {
        if !args.mute {
            eprintln!(
                "morsekey was built without the \"streaming\" feature; rebuild with `--features streaming` for sound."
            );
        }
    }

    run(&args, &config, bank, Arc::new(NullEngine))
}

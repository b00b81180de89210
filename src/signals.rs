//! Precomputed DIT/DAH audio
//!
//! Both signals are synthesized and encoded once at startup. The bank is
//! immutable afterwards and is shared by every playback worker.

use crate::config::ToneConfig;
use crate::synth::{synthesize, ToneSpec};
use crate::wav::{encode, EncodedAudio};
use crate::Result;
use std::fmt;

/// A single Morse signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorseSymbol {
    /// Short signal
    Dit,
    /// Long signal
    Dah,
}

impl MorseSymbol {
    /// Parse one code character (`.` or `-`)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(MorseSymbol::Dit),
            '-' => Some(MorseSymbol::Dah),
            _ => None,
        }
    }

    /// Parse a code string, skipping every character that is not `.` or `-`
    pub fn parse_sequence(code: &str) -> Vec<Self> {
        code.chars().filter_map(Self::from_char).collect()
    }

    /// Code character for this symbol
    pub fn as_char(&self) -> char {
        match self {
            MorseSymbol::Dit => '.',
            MorseSymbol::Dah => '-',
        }
    }
}

impl fmt::Display for MorseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MorseSymbol::Dit => "dit",
            MorseSymbol::Dah => "dah",
        })
    }
}

/// Encoded audio for both symbols
#[derive(Debug, Clone)]
pub struct SignalBank {
    dit: EncodedAudio,
    dah: EncodedAudio,
}

impl SignalBank {
    /// Synthesize and encode both signals
    ///
    /// # Errors
    /// `InvalidToneSpec` if the configuration describes an impossible tone.
    pub fn build(config: &ToneConfig) -> Result<Self> {
        let bank = Self {
            dit: render(&config.dit_spec())?,
            dah: render(&config.dah_spec())?,
        };
        log::info!(
            "signal bank ready: {} Hz, dit {:?}, dah {:?} @ {} Hz",
            config.frequency,
            bank.dit.duration(),
            bank.dah.duration(),
            config.sample_rate
        );
        Ok(bank)
    }

    /// Assemble a bank from already encoded audio
    pub fn from_parts(dit: EncodedAudio, dah: EncodedAudio) -> Self {
        Self { dit, dah }
    }

    /// Audio for a symbol
    pub fn get(&self, symbol: MorseSymbol) -> &EncodedAudio {
        match symbol {
            MorseSymbol::Dit => &self.dit,
            MorseSymbol::Dah => &self.dah,
        }
    }
}

fn render(spec: &ToneSpec) -> Result<EncodedAudio> {
    encode(&synthesize(spec)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MorseError;
    use std::time::Duration;

    #[test]
    fn test_parse_sequence() {
        use MorseSymbol::{Dah, Dit};
        assert_eq!(MorseSymbol::parse_sequence(".-"), vec![Dit, Dah]);
        assert_eq!(MorseSymbol::parse_sequence("-. x-"), vec![Dah, Dit, Dah]);
        assert!(MorseSymbol::parse_sequence(" ").is_empty());
    }

    #[test]
    fn test_default_bank() {
        let bank = SignalBank::build(&ToneConfig::default()).unwrap();
        assert_eq!(bank.get(MorseSymbol::Dit).sample_count(), 4410);
        assert_eq!(bank.get(MorseSymbol::Dah).sample_count(), 13230);
        assert_eq!(bank.get(MorseSymbol::Dit).duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_from_parts_keeps_assignment() {
        let short = render(&ToneSpec::new(600.0, 0.05)).unwrap();
        let long = render(&ToneSpec::new(600.0, 0.15)).unwrap();
        let bank = SignalBank::from_parts(short.clone(), long.clone());
        assert_eq!(bank.get(MorseSymbol::Dit), &short);
        assert_eq!(bank.get(MorseSymbol::Dah), &long);
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = ToneConfig {
            dah_duration: -1.0,
            ..ToneConfig::default()
        };
        assert!(matches!(
            SignalBank::build(&config),
            Err(MorseError::InvalidToneSpec(_))
        ));
    }
}

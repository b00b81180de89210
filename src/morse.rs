//! Character table and playback requests
//!
//! The table maps an uppercase character to a string over `.`, `-` and ` `.
//! Characters outside the table are ignored by the playback path.

use crate::signals::MorseSymbol;

/// Keyboard rows shown by front ends, top to bottom
pub const KEYBOARD_ROWS: [&str; 5] = ["1234567890", "QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM", ".,?!"];

/// Key that deletes the last displayed entry (handled by the display only)
pub const DELETE_KEY: char = '\u{8}';

const MORSE_TABLE: [(char, &str); 41] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    (' ', " "),
    ('!', "-.-.--"),
    ('?', "..--.."),
    ('.', ".-.-.-"),
    (',', "--..--"),
];

/// Morse string for a character (case-insensitive)
pub fn lookup(c: char) -> Option<&'static str> {
    let upper = c.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, code)| *code)
}

/// True for the delete-last-entry key
pub fn is_delete(c: char) -> bool {
    c == DELETE_KEY
}

/// One key press worth of symbols to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    /// Symbols in playback order
    pub symbols: Vec<MorseSymbol>,
    /// Key that produced the request (uppercase)
    pub key: char,
}

impl PlaybackRequest {
    /// Build a request from explicit symbols
    pub fn new(key: char, symbols: Vec<MorseSymbol>) -> Self {
        Self { symbols, key }
    }

    /// Build the request for a typed character, `None` if it has no code
    pub fn for_key(c: char) -> Option<Self> {
        let code = lookup(c)?;
        Some(Self::new(
            c.to_ascii_uppercase(),
            MorseSymbol::parse_sequence(code),
        ))
    }

    /// Text rendering of the symbols
    pub fn code(&self) -> String {
        self.symbols.iter().map(|s| s.as_char()).collect()
    }
}

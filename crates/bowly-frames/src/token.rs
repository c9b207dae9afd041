//! Roll tokens.
//!
//! A roll is entered as one symbol: a digit for pins knocked down, `X` for a
//! strike or `/` for a spare. The tokenizer here is the only place raw
//! characters are interpreted; everything downstream works on [`Roll`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pins standing at the start of a frame.
pub const PINS: u8 = 10;

/// Largest pin count a digit token can carry.
pub const MAX_DIGIT: u8 = 9;

/// A single normalized roll token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Roll {
    /// Pins knocked down, 0-9.
    Digit(u8),
    /// All ten pins on the first roll of a frame.
    Strike,
    /// The remaining pins on the second roll of a frame.
    Spare,
}

impl Roll {
    /// Tokenize a single keypad character.
    ///
    /// Accepts `0`-`9`, `X`, `x` and `/`. Returns `None` for anything else.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' | 'x' => Some(Self::Strike),
            '/' => Some(Self::Spare),
            // to_digit(10) only yields 0..=9, which always fits in a u8
            d => d
                .to_digit(10)
                .and_then(|n| u8::try_from(n).ok())
                .map(Self::Digit),
        }
    }

    /// The canonical character for this token.
    ///
    /// A `Digit` above 9 has no keypad symbol and shows as `?`.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Strike => 'X',
            Self::Spare => '/',
            Self::Digit(n) => char::from_digit(u32::from(n), 10).unwrap_or('?'),
        }
    }

    /// Check if this token is a digit.
    #[must_use]
    pub fn is_digit(self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Check if this token is in the keypad grammar.
    ///
    /// Only false for a `Digit` built directly with a value above 9.
    #[must_use]
    pub fn is_valid(self) -> bool {
        match self {
            Self::Digit(n) => n <= MAX_DIGIT,
            Self::Strike | Self::Spare => true,
        }
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(n) => write!(f, "{n}"),
            _ => write!(f, "{}", self.as_char()),
        }
    }
}

/// Error returned when text is not exactly one roll symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRollError(pub String);

impl fmt::Display for ParseRollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid roll token: {:?}", self.0)
    }
}

impl std::error::Error for ParseRollError {}

impl FromStr for Roll {
    type Err = ParseRollError;

    /// Parse one token. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| ParseRollError(s.to_string())),
            _ => Err(ParseRollError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Roll {
    type Error = ParseRollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Roll> for String {
    fn from(roll: Roll) -> Self {
        roll.to_string()
    }
}

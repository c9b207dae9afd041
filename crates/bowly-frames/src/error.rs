//! Error types for frame entry and validation.
//!
//! Frame numbers in these errors are 1-based and roll numbers are 1-based so
//! that messages read the way a bowler counts.

use thiserror::Error;

/// A rejection produced while parsing or validating a frame grid.
///
/// Every variant is recoverable: the caller shows the message and lets the
/// bowler correct the offending cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    // === Grammar Errors ===
    /// A token outside `[0-9Xx/]`.
    #[error("frame {frame}, roll {roll}: invalid input ({token})")]
    Grammar {
        /// Frame number (1-10).
        frame: usize,
        /// Roll number within the frame (1-3).
        roll: usize,
        /// The offending text.
        token: String,
    },

    // === Structural Errors ===
    /// More tokens than the frame allows.
    #[error("frame {frame} allows at most {max} rolls, found {found}")]
    TooManyRolls {
        /// Frame number (1-10).
        frame: usize,
        /// Maximum rolls for this frame.
        max: usize,
        /// Number of tokens present.
        found: usize,
    },

    /// A strike followed by another roll in frames 1-9.
    #[error("frame {frame}: a strike ends the frame, enter only one roll")]
    StrikeWithSecondRoll {
        /// Frame number (1-9).
        frame: usize,
    },

    /// A spare marker in the first roll of frames 1-9.
    #[error("frame {frame}: a spare cannot be the first roll")]
    SpareFirst {
        /// Frame number (1-9).
        frame: usize,
    },

    /// A spare marker whose first roll is not a digit.
    #[error("frame {frame}: when the second roll is a spare, the first roll must be a digit")]
    SpareWithoutDigit {
        /// Frame number (1-9).
        frame: usize,
    },

    /// A strike marker in the second roll of frames 1-9.
    ///
    /// Such a roll has no pin value the scorer could use, so it is rejected
    /// here instead of being counted as 0. This keeps roll expansion total
    /// over [`ValidatedFrames`](crate::ValidatedFrames).
    #[error("frame {frame}: a strike can only be the first roll")]
    StrikeAfterFirstRoll {
        /// Frame number (1-9).
        frame: usize,
    },

    /// Frames notation with more than ten frames.
    #[error("a game has 10 frames, found {found}")]
    FrameCount {
        /// Number of frames supplied.
        found: usize,
    },
}

impl FrameError {
    /// Frame number the error points at, if any.
    #[must_use]
    pub fn frame(&self) -> Option<usize> {
        match self {
            Self::Grammar { frame, .. }
            | Self::TooManyRolls { frame, .. }
            | Self::StrikeWithSecondRoll { frame }
            | Self::SpareFirst { frame }
            | Self::SpareWithoutDigit { frame }
            | Self::StrikeAfterFirstRoll { frame } => Some(*frame),
            Self::FrameCount { .. } => None,
        }
    }

    /// Check if this error is a grammar (symbol set) violation.
    #[must_use]
    pub fn is_grammar_error(&self) -> bool {
        matches!(self, Self::Grammar { .. })
    }
}

/// A rejected keypad or navigation event.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// A key was pressed with no cell selected.
    #[error("select a cell before entering a roll")]
    NoActiveCell,

    /// A key outside the keypad grammar.
    #[error("invalid key '{0}'")]
    InvalidKey(char),

    /// A selection outside the ten-frame grid.
    #[error("no such cell: frame {frame}, roll {roll}")]
    InvalidCell {
        /// Requested frame number.
        frame: usize,
        /// Requested roll index (0-based).
        roll: usize,
    },
}

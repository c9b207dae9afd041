//! The ten-frame grid.
//!
//! A [`FrameGrid`] holds the roll tokens entered for each of the ten frames.
//! An empty frame means "not entered", not zero pins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::token::Roll;
use crate::validate::check_frame;

/// Number of frames in a game.
pub const FRAME_COUNT: usize = 10;

/// The final frame, which allows fill balls.
pub const LAST_FRAME: usize = 10;

/// Maximum number of rolls a frame (1-based) can hold.
#[must_use]
pub fn max_rolls(frame: usize) -> usize {
    if frame == LAST_FRAME {
        3
    } else {
        2
    }
}

/// Roll tokens for all ten frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameGrid {
    frames: [Vec<Roll>; FRAME_COUNT],
}

impl FrameGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from typed frames without checking them.
    #[must_use]
    pub fn from_frames(frames: [Vec<Roll>; FRAME_COUNT]) -> Self {
        Self { frames }
    }

    /// Parse raw text tokens, one list per frame.
    ///
    /// Frames are checked in order and the first violation is returned: for
    /// each frame the token count is checked, then every token is run
    /// through the tokenizer, then the frame's marker rules are applied.
    /// Missing trailing frames are treated as empty.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] for more than ten frames or for the first
    /// frame that breaks the grammar.
    pub fn parse<S: AsRef<str>>(raw: &[Vec<S>]) -> Result<Self, FrameError> {
        if raw.len() > FRAME_COUNT {
            return Err(FrameError::FrameCount { found: raw.len() });
        }

        let mut grid = Self::new();
        for (idx, tokens) in raw.iter().enumerate() {
            let frame = idx + 1;
            let max = max_rolls(frame);
            if tokens.len() > max {
                return Err(FrameError::TooManyRolls {
                    frame,
                    max,
                    found: tokens.len(),
                });
            }

            let rolls = tokens
                .iter()
                .enumerate()
                .map(|(r, token)| {
                    token.as_ref().parse::<Roll>().map_err(|_| FrameError::Grammar {
                        frame,
                        roll: r + 1,
                        token: token.as_ref().to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            check_frame(frame, &rolls)?;
            grid.frames[idx] = rolls;
        }
        Ok(grid)
    }

    /// Parse compact frames notation.
    ///
    /// Frames are separated by commas and every non-whitespace character
    /// inside a frame is one roll token, e.g. `X,9/,81,,7` leaves frame 4
    /// empty. Fewer than ten frames are padded with empty frames.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] under the same rules as [`FrameGrid::parse`].
    pub fn parse_notation(notation: &str) -> Result<Self, FrameError> {
        let raw: Vec<Vec<String>> = notation
            .split(',')
            .map(|frame| {
                frame
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(String::from)
                    .collect()
            })
            .collect();
        Self::parse(&raw)
    }

    /// Rolls entered for a frame (1-based). Out-of-range frames are empty.
    #[must_use]
    pub fn frame(&self, frame: usize) -> &[Roll] {
        frame
            .checked_sub(1)
            .and_then(|idx| self.frames.get(idx))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Iterate over `(frame number, rolls)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Roll])> {
        self.frames
            .iter()
            .enumerate()
            .map(|(idx, rolls)| (idx + 1, rolls.as_slice()))
    }

    /// Check if no roll has been entered in any frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(Vec::is_empty)
    }

    /// Total number of tokens across all frames.
    #[must_use]
    pub fn roll_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }
}

impl fmt::Display for FrameGrid {
    /// Formats the grid in frames notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, rolls) in self.frames.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            for roll in rolls {
                write!(f, "{roll}")?;
            }
        }
        Ok(())
    }
}

//! Frame validation.
//!
//! Validation is the gate in front of the score calculator: [`validate`]
//! is the only way to obtain a [`ValidatedFrames`], and
//! [`score`](crate::score::score) only accepts that type.

use tracing::debug;

use crate::error::FrameError;
use crate::frame::{max_rolls, FrameGrid, LAST_FRAME};
use crate::token::Roll;

/// A frame grid that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFrames(FrameGrid);

impl ValidatedFrames {
    /// The underlying grid.
    #[must_use]
    pub fn grid(&self) -> &FrameGrid {
        &self.0
    }

    /// Unwrap into the underlying grid.
    #[must_use]
    pub fn into_inner(self) -> FrameGrid {
        self.0
    }
}

/// Validate a frame grid against the scoring grammar.
///
/// Frames are checked in order 1 to 10 and the first violation is returned.
/// Each frame is checked for its roll count, then every token against the
/// keypad grammar, then the marker rules. Empty frames are accepted so that
/// a partially filled grid can be scored.
///
/// # Errors
///
/// Returns the [`FrameError`] describing the first offending frame.
pub fn validate(grid: &FrameGrid) -> Result<ValidatedFrames, FrameError> {
    for (frame, rolls) in grid.iter() {
        if let Err(err) = check_rolls(frame, rolls) {
            debug!(frame, %err, "frame rejected");
            return Err(err);
        }
    }
    Ok(ValidatedFrames(grid.clone()))
}

fn check_rolls(frame: usize, rolls: &[Roll]) -> Result<(), FrameError> {
    let max = max_rolls(frame);
    if rolls.len() > max {
        return Err(FrameError::TooManyRolls {
            frame,
            max,
            found: rolls.len(),
        });
    }
    if let Some((idx, roll)) = rolls.iter().enumerate().find(|(_, r)| !r.is_valid()) {
        return Err(FrameError::Grammar {
            frame,
            roll: idx + 1,
            token: roll.to_string(),
        });
    }
    check_frame(frame, rolls)
}

/// Apply the marker adjacency rules to a single frame.
///
/// The tenth frame is exempt: its second and third rolls may each be a
/// strike, a spare or a digit.
pub(crate) fn check_frame(frame: usize, rolls: &[Roll]) -> Result<(), FrameError> {
    if frame == LAST_FRAME {
        return Ok(());
    }

    match rolls {
        [Roll::Strike, _, ..] => Err(FrameError::StrikeWithSecondRoll { frame }),
        [first, Roll::Spare, ..] if !first.is_digit() => {
            Err(FrameError::SpareWithoutDigit { frame })
        }
        [Roll::Spare, ..] => Err(FrameError::SpareFirst { frame }),
        [_, Roll::Strike, ..] => Err(FrameError::StrikeAfterFirstRoll { frame }),
        _ => Ok(()),
    }
}

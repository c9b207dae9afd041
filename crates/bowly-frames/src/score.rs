//! Score calculation.
//!
//! Scoring happens in two steps. The validated grid is first expanded into a
//! flat roll sequence of pin counts with no frame boundaries, then ten
//! logical frames are walked over that sequence applying the usual strike
//! and spare bonuses. Tenth-frame fill balls are already in the sequence,
//! so they are picked up as bonus rolls without special casing.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::frame::FRAME_COUNT;
use crate::token::{Roll, PINS};
use crate::validate::ValidatedFrames;

/// Highest possible score.
pub const PERFECT_GAME: u16 = 300;

/// The outcome of scoring a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Total score, 0-300.
    pub total: u16,
    /// Frames scored as strikes.
    pub strikes: u8,
    /// Frames scored as spares.
    pub spares: u8,
}

/// Expand validated frames into the flat roll sequence.
///
/// A strike is 10 pins, a digit is its own value and a spare is whatever
/// remains from the previous roll (10 minus the last emitted value). In
/// frames 1-9 a spare always follows a digit in the same frame; in the
/// tenth frame it may follow a strike fill ball, which makes it worth 0.
#[must_use]
pub fn expand_rolls(frames: &ValidatedFrames) -> Vec<u8> {
    let mut rolls: Vec<u8> = Vec::with_capacity(21);
    for (_, tokens) in frames.grid().iter() {
        for token in tokens {
            let pins = match *token {
                Roll::Strike => PINS,
                Roll::Digit(n) => n,
                Roll::Spare => PINS.saturating_sub(rolls.last().copied().unwrap_or(0)),
            };
            rolls.push(pins);
        }
    }
    rolls
}

/// Score a validated frame grid.
///
/// Missing rolls count as 0, so a partially entered grid yields the score
/// of what has been entered so far.
#[must_use]
pub fn score(frames: &ValidatedFrames) -> ScoreResult {
    let rolls = expand_rolls(frames);
    let roll = |i: usize| u16::from(rolls.get(i).copied().unwrap_or(0));
    let ten = u16::from(PINS);

    let mut result = ScoreResult::default();
    let mut cursor = 0;
    for frame in 1..=FRAME_COUNT {
        let frame_score = if roll(cursor) == ten {
            result.strikes += 1;
            cursor += 1;
            ten + roll(cursor) + roll(cursor + 1)
        } else if roll(cursor) + roll(cursor + 1) == ten {
            result.spares += 1;
            cursor += 2;
            ten + roll(cursor)
        } else {
            cursor += 2;
            roll(cursor - 2) + roll(cursor - 1)
        };
        trace!(frame, frame_score, "scored frame");
        result.total += frame_score;
    }

    debug_assert!(result.total <= PERFECT_GAME);
    result
}

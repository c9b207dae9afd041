//! Game records.
//!
//! A [`GameRecord`] is one logged game: its date, final score and strike and
//! spare counts. Scores come either from manual entry or from the frame
//! calculator via [`NewGame::from_score`].

use bowly_frames::ScoreResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest valid game score.
pub const MAX_SCORE: u16 = 300;

/// Most strikes a single game can contain.
pub const MAX_STRIKES: u8 = 12;

/// Upper bound accepted for manually entered spare counts.
pub const MAX_SPARES: u8 = 21;

/// Length of a record id in hex characters.
const ID_LEN: usize = 16;

/// A game waiting to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGame {
    /// Day the game was bowled.
    pub date: NaiveDate,
    /// Final score.
    pub score: u16,
    /// Number of strikes.
    pub strikes: u8,
    /// Number of spares.
    pub spares: u8,
}

impl NewGame {
    /// Create a game, checking score, strike and spare ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordValidation`] when a value is out of range.
    pub fn new(date: NaiveDate, score: u16, strikes: u8, spares: u8) -> Result<Self> {
        let game = Self {
            date,
            score,
            strikes,
            spares,
        };
        game.validate()?;
        Ok(game)
    }

    /// Create a game from a frame calculator result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordValidation`] when a value is out of range.
    pub fn from_score(date: NaiveDate, result: ScoreResult) -> Result<Self> {
        Self::new(date, result.total, result.strikes, result.spares)
    }

    /// Check score, strike and spare ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordValidation`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        validate_counts(self.score, self.strikes, self.spares)
    }
}

fn validate_counts(score: u16, strikes: u8, spares: u8) -> Result<()> {
    if score > MAX_SCORE {
        return Err(Error::record(format!(
            "score must be between 0 and {MAX_SCORE}, got {score}"
        )));
    }
    if strikes > MAX_STRIKES {
        return Err(Error::record(format!(
            "strikes must be between 0 and {MAX_STRIKES}, got {strikes}"
        )));
    }
    if spares > MAX_SPARES {
        return Err(Error::record(format!(
            "spares must be between 0 and {MAX_SPARES}, got {spares}"
        )));
    }
    Ok(())
}

/// A stored game.
///
/// Several games may share a date; `created_at` orders them within a day.
/// The JSON form uses camelCase keys and a millisecond `createdAt` so that
/// backup files stay compatible with earlier exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Stable identifier (BLAKE3 digest prefix).
    #[serde(default)]
    pub id: String,

    /// Day the game was bowled.
    pub date: NaiveDate,

    /// Final score.
    pub score: u16,

    /// Number of strikes.
    #[serde(default)]
    pub strikes: u8,

    /// Number of spares.
    #[serde(default)]
    pub spares: u8,

    /// When the record was created.
    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl GameRecord {
    /// Create a record for a new game, timestamped now.
    #[must_use]
    pub fn new(game: NewGame) -> Self {
        Self::with_created_at(game, Utc::now())
    }

    /// Create a record with an explicit creation time.
    #[must_use]
    pub fn with_created_at(game: NewGame, created_at: DateTime<Utc>) -> Self {
        let mut record = Self {
            id: String::new(),
            date: game.date,
            score: game.score,
            strikes: game.strikes,
            spares: game.spares,
            created_at,
        };
        record.id = record.compute_id();
        record
    }

    /// Compute the id for this record's contents.
    ///
    /// The digest covers date, score, counts and creation time, so two
    /// identical games logged at different moments get different ids.
    #[must_use]
    pub fn compute_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.date.to_string().as_bytes());
        hasher.update(&self.score.to_le_bytes());
        hasher.update(&[self.strikes, self.spares]);
        hasher.update(&self.created_at.timestamp_millis().to_le_bytes());
        hasher.finalize().to_hex()[..ID_LEN].to_string()
    }

    /// Fill in a missing id (records from older backups have none).
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = self.compute_id();
        }
    }

    /// Check score, strike and spare ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordValidation`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        validate_counts(self.score, self.strikes, self.spares)
    }
}

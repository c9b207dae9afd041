//! Trend statistics and coaching suggestions.
//!
//! Everything here is computed from records in date order, oldest first,
//! as returned by [`Storage::list`](crate::Storage::list).

use std::fmt;

use serde::Serialize;

use crate::record::GameRecord;

/// Games shown as "recent" when no configuration overrides it.
pub const DEFAULT_RECENT_GAMES: usize = 5;

/// Games averaged for the trend comparison when no configuration overrides it.
pub const DEFAULT_TREND_WINDOW: usize = 3;

/// Recent form this far below the overall average counts as declining.
const DECLINE_MARGIN: f64 = 10.0;

/// Recent form this far above the overall average counts as improving.
const IMPROVE_MARGIN: f64 = 5.0;

/// Summary over all logged games.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of games.
    pub games: usize,
    /// Mean score rounded to two decimals, 0 when there are no games.
    pub average: f64,
    /// Best score.
    pub max: Option<u16>,
    /// Latest scores, oldest first.
    pub recent: Vec<u16>,
    /// Strikes across all games.
    pub total_strikes: u32,
    /// Spares across all games.
    pub total_spares: u32,
    /// Target average.
    pub target: f64,
    /// Coaching suggestion for the current trend.
    pub suggestion: Suggestion,
}

impl Statistics {
    /// Compute statistics over `records`, which must be oldest first.
    ///
    /// `recent_games` bounds the recent score list and `trend_window` is the
    /// number of latest games compared against the average.
    #[must_use]
    pub fn compute(
        records: &[GameRecord],
        target: f64,
        recent_games: usize,
        trend_window: usize,
    ) -> Self {
        let scores: Vec<u16> = records.iter().map(|r| r.score).collect();
        let recent = scores[scores.len().saturating_sub(recent_games)..].to_vec();

        Self {
            games: scores.len(),
            average: round2(mean(&scores)),
            max: scores.iter().copied().max(),
            recent,
            total_strikes: records.iter().map(|r| u32::from(r.strikes)).sum(),
            total_spares: records.iter().map(|r| u32::from(r.spares)).sum(),
            target,
            suggestion: Suggestion::evaluate(&scores, trend_window),
        }
    }

    /// Points still needed to reach the target.
    ///
    /// Formatted `+x.xx` while below target, `-x.xx` once past it, and
    /// `0.00` when exactly on it.
    #[must_use]
    pub fn target_gap(&self) -> String {
        format_gap(self.target - self.average)
    }
}

fn format_gap(gap: f64) -> String {
    let rounded = round2(gap);
    if rounded > 0.0 {
        format!("+{rounded:.2}")
    } else if rounded < 0.0 {
        format!("{rounded:.2}")
    } else {
        "0.00".to_string()
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(scores: &[u16]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    sum as f64 / scores.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coaching suggestion from recent form against the overall average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    /// Too few games for a trend.
    NotEnoughGames {
        /// Games required before a suggestion is made.
        needed: usize,
    },
    /// Recent games are well below the average.
    Declining,
    /// Recent games are above the average.
    Improving,
    /// Recent games are close to the average.
    Steady,
}

impl Suggestion {
    /// Compare the mean of the last `window` scores with the overall mean.
    ///
    /// `scores` must be oldest first. A `window` of 0 is treated as 1.
    #[must_use]
    pub fn evaluate(scores: &[u16], window: usize) -> Self {
        let window = window.max(1);
        if scores.len() < window {
            return Self::NotEnoughGames { needed: window };
        }

        let average = round2(mean(scores));
        let recent = mean(&scores[scores.len() - window..]);

        if recent < average - DECLINE_MARGIN {
            Self::Declining
        } else if recent > average + IMPROVE_MARGIN {
            Self::Improving
        } else {
            Self::Steady
        }
    }

    /// Message shown to the bowler.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotEnoughGames { needed } => {
                format!("Log at least {needed} games to get a suggestion.")
            }
            Self::Declining => "Your last few games have dropped off. Work on your fundamentals \
                                and consistency."
                .to_string(),
            Self::Improving => {
                "Keep it up! You're improving and the target is within reach.".to_string()
            }
            Self::Steady => {
                "Steady performance. Keep practicing to break through to your target.".to_string()
            }
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::record::NewGame;

    fn records(games: &[(u16, u8, u8)]) -> Vec<GameRecord> {
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        games
            .iter()
            .enumerate()
            .map(|(i, &(score, strikes, spares))| {
                let offset = i64::try_from(i).unwrap();
                let game =
                    NewGame::new(start + Duration::days(offset), score, strikes, spares).unwrap();
                let at = Utc.timestamp_millis_opt(1_780_000_000_000 + offset).unwrap();
                GameRecord::with_created_at(game, at)
            })
            .collect()
    }

    #[test]
    fn test_empty_statistics() {
        let stats = Statistics::compute(&[], 170.0, 5, 3);
        assert_eq!(stats.games, 0);
        assert!(stats.average.abs() < f64::EPSILON);
        assert_eq!(stats.max, None);
        assert!(stats.recent.is_empty());
        assert_eq!(stats.total_strikes, 0);
        assert_eq!(stats.target_gap(), "+170.00");
        assert_eq!(stats.suggestion, Suggestion::NotEnoughGames { needed: 3 });
    }

    #[test]
    fn test_basic_statistics() {
        let recs = records(&[(150, 3, 4), (180, 5, 2), (201, 7, 3)]);
        let stats = Statistics::compute(&recs, 170.0, 5, 3);

        assert_eq!(stats.games, 3);
        assert!((stats.average - 177.0).abs() < f64::EPSILON);
        assert_eq!(stats.max, Some(201));
        assert_eq!(stats.recent, vec![150, 180, 201]);
        assert_eq!(stats.total_strikes, 15);
        assert_eq!(stats.total_spares, 9);
    }

    #[test]
    fn test_average_is_rounded() {
        let recs = records(&[(100, 0, 0), (100, 0, 0), (101, 0, 0)]);
        let stats = Statistics::compute(&recs, 170.0, 5, 3);
        assert!((stats.average - 100.33).abs() < 1e-9);
        assert_eq!(stats.target_gap(), "+69.67");
    }

    #[test]
    fn test_recent_keeps_last_five_in_order() {
        let recs = records(&[
            (100, 0, 0),
            (110, 0, 0),
            (120, 0, 0),
            (130, 0, 0),
            (140, 0, 0),
            (150, 0, 0),
            (160, 0, 0),
        ]);
        let stats = Statistics::compute(&recs, 170.0, 5, 3);
        assert_eq!(stats.recent, vec![120, 130, 140, 150, 160]);
    }

    #[test]
    fn test_target_gap_formatting() {
        assert_eq!(format_gap(12.5), "+12.50");
        assert_eq!(format_gap(-3.25), "-3.25");
        assert_eq!(format_gap(0.0), "0.00");
        assert_eq!(format_gap(-0.001), "0.00");
    }

    #[test]
    fn test_target_gap_past_target() {
        let recs = records(&[(200, 0, 0), (190, 0, 0)]);
        let stats = Statistics::compute(&recs, 170.0, 5, 3);
        assert_eq!(stats.target_gap(), "-25.00");
    }

    #[test]
    fn test_suggestion_not_enough_games() {
        assert_eq!(
            Suggestion::evaluate(&[150, 160], 3),
            Suggestion::NotEnoughGames { needed: 3 }
        );
    }

    #[test]
    fn test_suggestion_declining() {
        // average 160, last three 140
        let scores = [200, 200, 200, 140, 140, 140, 100, 160, 160];
        assert_eq!(Suggestion::evaluate(&scores, 3), Suggestion::Declining);
    }

    #[test]
    fn test_suggestion_improving() {
        // average 150, last three 170
        assert_eq!(
            Suggestion::evaluate(&[130, 130, 130, 170, 170, 170], 3),
            Suggestion::Improving
        );
    }

    #[test]
    fn test_suggestion_steady() {
        assert_eq!(
            Suggestion::evaluate(&[150, 150, 150], 3),
            Suggestion::Steady
        );
    }

    #[test]
    fn test_suggestion_boundaries_are_steady() {
        // average 160, last three 150: exactly 10 below
        assert_eq!(
            Suggestion::evaluate(&[180, 180, 150, 150, 150, 150], 3),
            Suggestion::Steady
        );
        // average 100, last three 105: exactly 5 above
        assert_eq!(
            Suggestion::evaluate(&[95, 95, 95, 105, 105, 105], 3),
            Suggestion::Steady
        );
    }

    #[test]
    fn test_custom_trend_window() {
        let recs = records(&[(100, 0, 0), (100, 0, 0), (100, 0, 0), (160, 0, 0)]);
        let stats = Statistics::compute(&recs, 170.0, 5, 3);
        // last three 120 vs average 115: steady
        assert_eq!(stats.suggestion, Suggestion::Steady);

        let stats = Statistics::compute(&recs, 170.0, 5, 1);
        assert_eq!(stats.suggestion, Suggestion::Improving);
    }

    #[test]
    fn test_suggestion_messages() {
        assert!(Suggestion::NotEnoughGames { needed: 3 }
            .message()
            .contains("at least 3 games"));
        assert!(Suggestion::Declining.to_string().contains("fundamentals"));
        assert!(Suggestion::Improving.message().contains("improving"));
        assert!(Suggestion::Steady.message().contains("Steady"));
    }

    #[test]
    fn test_statistics_json() {
        let recs = records(&[(150, 3, 4)]);
        let json = serde_json::to_value(Statistics::compute(&recs, 170.0, 5, 3)).unwrap();
        assert_eq!(json["games"], 1);
        assert_eq!(json["totalStrikes"], 3);
        assert_eq!(json["suggestion"]["not_enough_games"]["needed"], 3);
    }
}

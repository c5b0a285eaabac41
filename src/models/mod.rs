pub mod fixture;
pub mod prediction;
pub mod score;
pub mod settlement;
pub mod tournament;

pub use fixture::Match;
pub use prediction::Prediction;
pub use score::{LeaderboardEntry, Score, Standing};
pub use settlement::SettlementResult;
pub use tournament::Tournament;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Three-valued result of a match, also the value a user picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "match_outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::HomeWin => write!(f, "HOME_WIN"),
            Outcome::Draw => write!(f, "DRAW"),
            Outcome::AwayWin => write!(f, "AWAY_WIN"),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "match_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    InPlay,
    Finished,
    Postponed,
    Canceled,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "SCHEDULED"),
            MatchStatus::InPlay => write!(f, "IN_PLAY"),
            MatchStatus::Finished => write!(f, "FINISHED"),
            MatchStatus::Postponed => write!(f, "POSTPONED"),
            MatchStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

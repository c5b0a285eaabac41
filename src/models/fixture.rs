use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{MatchStatus, Outcome};

/// Database row for matches table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: i64,
    pub tournament_id: i64,
    pub home_team: String,
    pub away_team: String,
    pub match_datetime: DateTime<Utc>,
    pub status: MatchStatus,
    pub result: Option<Outcome>,
    pub settled: bool,
}

impl Match {
    /// Finished, resolved by the feed, and not yet settled.
    pub fn is_settleable(&self) -> bool {
        self.status == MatchStatus::Finished && self.result.is_some() && !self.settled
    }
}

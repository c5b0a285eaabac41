use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for scores table. Unique per (user_id, tournament_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Score {
    pub user_id: Uuid,
    pub tournament_id: i64,
    pub points: i64,
    pub updated_at: DateTime<Utc>,
}

/// A user's points in a tournament joined with their public username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Standing {
    pub user_id: Uuid,
    pub username: String,
    pub points: i64,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: Uuid,
    pub username: String,
    pub points: i64,
}

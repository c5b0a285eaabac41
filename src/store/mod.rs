//! Storage collaborator for settlement and leaderboards.
//!
//! The engine only talks to this trait. `PgStore` backs it with Postgres;
//! `MemoryStore` keeps everything in process for tests and local runs.
//!
//! Reads and writes that concern a single user's data take the owning
//! `user_id` explicitly. Missing rows come back as `None` / `NotFound`,
//! rows the caller may not touch as `Forbidden`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{Match, Prediction, Score, Standing, Tournament};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Matches with status Finished, a result, and `settled = false`.
    async fn find_unsettled_finished_matches(&self) -> Result<Vec<Match>, StoreError>;

    async fn find_predictions_for_match(&self, match_id: i64) -> Result<Vec<Prediction>, StoreError>;

    async fn get_score(&self, user_id: Uuid, tournament_id: i64) -> Result<Option<Score>, StoreError>;

    /// Write the (user, tournament) total, inserting the row if it is missing.
    async fn upsert_score(
        &self,
        user_id: Uuid,
        tournament_id: i64,
        new_total: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<Score, StoreError>;

    /// `NotFound` for an unknown match, `Conflict` if it is not finished with a result.
    async fn mark_match_settled(&self, match_id: i64) -> Result<(), StoreError>;

    async fn get_tournament(&self, tournament_id: i64) -> Result<Option<Tournament>, StoreError>;

    /// Ordered by points descending, then username ascending.
    async fn tournament_standings(&self, tournament_id: i64) -> Result<Vec<Standing>, StoreError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

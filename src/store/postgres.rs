use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::SettlementStore;
use crate::db::{match_repo, prediction_repo, score_repo, tournament_repo};
use crate::errors::StoreError;
use crate::models::{Match, Prediction, Score, Standing, Tournament};

/// Postgres-backed store. Thin adapter over the `db` repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettlementStore for PgStore {
    async fn find_unsettled_finished_matches(&self) -> Result<Vec<Match>, StoreError> {
        match_repo::get_unsettled_finished_matches(&self.pool).await
    }

    async fn find_predictions_for_match(&self, match_id: i64) -> Result<Vec<Prediction>, StoreError> {
        prediction_repo::get_predictions_for_match(&self.pool, match_id).await
    }

    async fn get_score(&self, user_id: Uuid, tournament_id: i64) -> Result<Option<Score>, StoreError> {
        score_repo::get_score(&self.pool, user_id, tournament_id).await
    }

    async fn upsert_score(
        &self,
        user_id: Uuid,
        tournament_id: i64,
        new_total: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<Score, StoreError> {
        score_repo::upsert_score(&self.pool, user_id, tournament_id, new_total, updated_at).await
    }

    async fn mark_match_settled(&self, match_id: i64) -> Result<(), StoreError> {
        match_repo::mark_match_settled(&self.pool, match_id).await
    }

    async fn get_tournament(&self, tournament_id: i64) -> Result<Option<Tournament>, StoreError> {
        tournament_repo::get_tournament(&self.pool, tournament_id).await
    }

    async fn tournament_standings(&self, tournament_id: i64) -> Result<Vec<Standing>, StoreError> {
        score_repo::get_tournament_standings(&self.pool, tournament_id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

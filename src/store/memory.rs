//! In-memory store.
//!
//! Mirrors the Postgres semantics closely enough to drive the engine in tests
//! and local runs, and lets callers inject failures per operation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SettlementStore;
use crate::errors::StoreError;
use crate::models::{Match, MatchStatus, Outcome, Prediction, Score, Standing, Tournament};

#[derive(Debug, Default)]
struct Failures {
    discovery: bool,
    ping: bool,
    predictions: HashSet<i64>,
    score_reads: HashSet<Uuid>,
    score_writes: HashSet<Uuid>,
    mark_settled: HashSet<i64>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<i64, String>>,
    profiles: RwLock<HashMap<Uuid, String>>,
    matches: RwLock<BTreeMap<i64, Match>>,
    predictions: RwLock<Vec<Prediction>>,
    scores: RwLock<HashMap<(Uuid, i64), Score>>,
    failures: RwLock<Failures>,
    next_prediction_id: AtomicI64,
    prediction_lookups: RwLock<Vec<i64>>,
    writes: AtomicUsize,
}

fn injected(what: String) -> StoreError {
    StoreError::Unexpected(anyhow::anyhow!("injected failure: {what}"))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Seeding ====================

    pub async fn add_tournament(&self, id: i64, name: &str) {
        self.tournaments.write().await.insert(id, name.to_string());
    }

    pub async fn add_profile(&self, user_id: Uuid, username: &str) {
        self.profiles.write().await.insert(user_id, username.to_string());
    }

    pub async fn insert_match(&self, m: Match) {
        self.matches.write().await.insert(m.id, m);
    }

    /// Place a prediction. At most one per (user, match).
    pub async fn insert_prediction(
        &self,
        user_id: Uuid,
        match_id: i64,
        picked_result: Outcome,
    ) -> Result<Prediction, StoreError> {
        if !self.matches.read().await.contains_key(&match_id) {
            return Err(StoreError::NotFound(format!("match {match_id}")));
        }

        let mut predictions = self.predictions.write().await;
        if predictions
            .iter()
            .any(|p| p.user_id == user_id && p.match_id == match_id)
        {
            return Err(StoreError::Conflict(format!(
                "prediction already exists for user {user_id} on match {match_id}"
            )));
        }

        let now = Utc::now();
        let prediction = Prediction {
            id: self.next_prediction_id.fetch_add(1, Ordering::Relaxed) + 1,
            user_id,
            match_id,
            picked_result,
            created_at: Some(now),
            updated_at: Some(now),
        };
        predictions.push(prediction.clone());
        Ok(prediction)
    }

    pub async fn set_score(&self, user_id: Uuid, tournament_id: i64, points: i64) {
        self.scores.write().await.insert(
            (user_id, tournament_id),
            Score {
                user_id,
                tournament_id,
                points,
                updated_at: Utc::now(),
            },
        );
    }

    // ==================== Inspection ====================

    pub async fn get_match(&self, match_id: i64) -> Option<Match> {
        self.matches.read().await.get(&match_id).cloned()
    }

    pub async fn points(&self, user_id: Uuid, tournament_id: i64) -> Option<i64> {
        self.scores
            .read()
            .await
            .get(&(user_id, tournament_id))
            .map(|s| s.points)
    }

    /// Match ids whose predictions were requested, in call order.
    pub async fn prediction_lookups(&self) -> Vec<i64> {
        self.prediction_lookups.read().await.clone()
    }

    /// Number of successful mutations (score upserts and settled flags).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    // ==================== Failure injection ====================

    pub async fn fail_discovery(&self) {
        self.failures.write().await.discovery = true;
    }

    pub async fn fail_ping(&self) {
        self.failures.write().await.ping = true;
    }

    pub async fn fail_predictions_for(&self, match_id: i64) {
        self.failures.write().await.predictions.insert(match_id);
    }

    pub async fn fail_score_read_for(&self, user_id: Uuid) {
        self.failures.write().await.score_reads.insert(user_id);
    }

    pub async fn fail_score_write_for(&self, user_id: Uuid) {
        self.failures.write().await.score_writes.insert(user_id);
    }

    pub async fn fail_mark_settled_for(&self, match_id: i64) {
        self.failures.write().await.mark_settled.insert(match_id);
    }
}

#[async_trait]
impl SettlementStore for MemoryStore {
    async fn find_unsettled_finished_matches(&self) -> Result<Vec<Match>, StoreError> {
        if self.failures.read().await.discovery {
            return Err(injected("unsettled match query".into()));
        }

        let matches = self.matches.read().await;
        Ok(matches
            .values()
            .filter(|m| m.is_settleable())
            .cloned()
            .collect())
    }

    async fn find_predictions_for_match(&self, match_id: i64) -> Result<Vec<Prediction>, StoreError> {
        self.prediction_lookups.write().await.push(match_id);

        if self.failures.read().await.predictions.contains(&match_id) {
            return Err(injected(format!("predictions for match {match_id}")));
        }

        let predictions = self.predictions.read().await;
        Ok(predictions
            .iter()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn get_score(&self, user_id: Uuid, tournament_id: i64) -> Result<Option<Score>, StoreError> {
        if self.failures.read().await.score_reads.contains(&user_id) {
            return Err(injected(format!("score read for user {user_id}")));
        }

        Ok(self
            .scores
            .read()
            .await
            .get(&(user_id, tournament_id))
            .cloned())
    }

    async fn upsert_score(
        &self,
        user_id: Uuid,
        tournament_id: i64,
        new_total: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<Score, StoreError> {
        if self.failures.read().await.score_writes.contains(&user_id) {
            return Err(injected(format!("score write for user {user_id}")));
        }
        if new_total < 0 {
            return Err(StoreError::Conflict(format!(
                "negative total {new_total} for user {user_id}"
            )));
        }

        let score = Score {
            user_id,
            tournament_id,
            points: new_total,
            updated_at,
        };
        self.scores
            .write()
            .await
            .insert((user_id, tournament_id), score.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);

        Ok(score)
    }

    async fn mark_match_settled(&self, match_id: i64) -> Result<(), StoreError> {
        if self.failures.read().await.mark_settled.contains(&match_id) {
            return Err(injected(format!("settled flag for match {match_id}")));
        }

        let mut matches = self.matches.write().await;
        let m = matches
            .get_mut(&match_id)
            .ok_or_else(|| StoreError::NotFound(format!("match {match_id}")))?;

        if m.status != MatchStatus::Finished || m.result.is_none() {
            return Err(StoreError::Conflict(format!(
                "match {} is {} without a final result",
                m.id, m.status
            )));
        }

        m.settled = true;
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get_tournament(&self, tournament_id: i64) -> Result<Option<Tournament>, StoreError> {
        Ok(self
            .tournaments
            .read()
            .await
            .get(&tournament_id)
            .map(|name| Tournament {
                id: tournament_id,
                name: name.clone(),
            }))
    }

    async fn tournament_standings(&self, tournament_id: i64) -> Result<Vec<Standing>, StoreError> {
        let scores = self.scores.read().await;
        let profiles = self.profiles.read().await;

        let mut standings: Vec<Standing> = scores
            .values()
            .filter(|s| s.tournament_id == tournament_id)
            .filter_map(|s| {
                profiles.get(&s.user_id).map(|username| Standing {
                    user_id: s.user_id,
                    username: username.clone(),
                    points: s.points,
                })
            })
            .collect();

        standings.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.username.cmp(&b.username))
        });

        Ok(standings)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.failures.read().await.ping {
            return Err(injected("ping".into()));
        }
        Ok(())
    }
}

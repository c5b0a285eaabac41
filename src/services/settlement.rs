use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use tokio::sync::Mutex;
use tokio::time::{interval, Duration};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{Match, Outcome, SettlementResult};
use crate::store::SettlementStore;

/// Fixed award for a correct pick. No partial credit.
pub const POINTS_PER_CORRECT_PICK: i64 = 3;

/// A pick scores only on an exact outcome match.
pub fn is_correct_pick(picked: Outcome, actual: Outcome) -> bool {
    picked == actual
}

/// Settle every finished, resolved, unsettled match.
///
/// Matches are processed one at a time. A failure inside one match (loading
/// its predictions, writing a user's score, flipping its settled flag) is
/// recorded in `errors` and never stops the others. Only a failure of the
/// initial match query is returned as `Err`.
///
/// In dry-run mode nothing is written; counters report what a live run would
/// have done.
pub async fn settle(
    store: &dyn SettlementStore,
    dry_run: bool,
) -> Result<SettlementResult, StoreError> {
    let started = Instant::now();
    counter!("settlement_runs_total").increment(1);

    let matches = store.find_unsettled_finished_matches().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch unsettled matches");
        e
    })?;

    let mut result = SettlementResult::default();

    if matches.is_empty() {
        tracing::debug!("No unsettled matches to process");
        record_duration(started);
        return Ok(result);
    }

    tracing::info!(count = matches.len(), dry_run, "Settling finished matches");

    for m in &matches {
        settle_match(store, m, dry_run, &mut result).await;
    }

    record_duration(started);

    tracing::info!(
        processed_matches = result.processed_matches,
        updated_scores = result.updated_scores,
        errors = result.errors.len(),
        dry_run,
        "Settlement completed"
    );

    Ok(result)
}

/// Settle a single match, folding counters and errors into `result`.
pub async fn settle_match(
    store: &dyn SettlementStore,
    m: &Match,
    dry_run: bool,
    result: &mut SettlementResult,
) {
    let Some(actual) = m.result.filter(|_| m.is_settleable()) else {
        tracing::warn!(
            match_id = m.id,
            status = %m.status,
            settled = m.settled,
            "Skipping match that is not eligible for settlement"
        );
        return;
    };

    let predictions = match store.find_predictions_for_match(m.id).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, match_id = m.id, "Failed to fetch predictions for match");
            record_error(
                result,
                format!("Failed to fetch predictions for match {}: {e}", m.id),
            );
            return;
        }
    };

    for prediction in &predictions {
        if !is_correct_pick(prediction.picked_result, actual) {
            continue;
        }

        if dry_run {
            result.updated_scores += 1;
            continue;
        }

        match award_points(store, prediction.user_id, m.tournament_id).await {
            Ok(new_total) => {
                result.updated_scores += 1;
                counter!("settlement_scores_updated_total").increment(1);
                tracing::info!(
                    user_id = %prediction.user_id,
                    match_id = m.id,
                    tournament_id = m.tournament_id,
                    points = POINTS_PER_CORRECT_PICK,
                    new_total,
                    "Points awarded"
                );
            }
            Err(message) => {
                tracing::error!(
                    user_id = %prediction.user_id,
                    match_id = m.id,
                    error = %message,
                    "Failed to award points"
                );
                record_error(result, message);
            }
        }
    }

    if !dry_run {
        if let Err(e) = store.mark_match_settled(m.id).await {
            tracing::error!(error = %e, match_id = m.id, "Failed to mark match as settled");
            record_error(result, format!("Failed to mark match {} as settled: {e}", m.id));
            return;
        }
        counter!("settlement_matches_settled_total").increment(1);
    }

    result.processed_matches += 1;

    tracing::info!(
        match_id = m.id,
        tournament_id = m.tournament_id,
        outcome = %actual,
        predictions = predictions.len(),
        dry_run,
        "Match settled"
    );
}

/// Read-add-write of one user's tournament total. A missing row counts as zero.
async fn award_points(
    store: &dyn SettlementStore,
    user_id: Uuid,
    tournament_id: i64,
) -> Result<i64, String> {
    let current = store
        .get_score(user_id, tournament_id)
        .await
        .map_err(|e| {
            format!("Failed to read score for user {user_id} in tournament {tournament_id}: {e}")
        })?
        .map(|s| s.points)
        .unwrap_or(0);

    let new_total = current + POINTS_PER_CORRECT_PICK;

    store
        .upsert_score(user_id, tournament_id, new_total, Utc::now())
        .await
        .map_err(|e| format!("Failed to upsert score for user {user_id}: {e}"))?;

    Ok(new_total)
}

fn record_duration(started: Instant) {
    histogram!("settlement_duration_seconds").record(started.elapsed().as_secs_f64());
}

fn record_error(result: &mut SettlementResult, message: String) {
    counter!("settlement_errors_total").increment(1);
    result.errors.push(message);
}

/// Periodically settle newly finished matches.
///
/// `settle_lock` is shared with every other in-process caller of `settle` so
/// runs never overlap. Fatal errors are logged and retried on the next tick.
pub async fn run_settlement_poller(
    store: Arc<dyn SettlementStore>,
    settle_lock: Arc<Mutex<()>>,
    interval_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        tracing::debug!("Settlement poller: checking finished matches");

        let _guard = settle_lock.lock().await;
        match settle(store.as_ref(), false).await {
            Ok(result) if !result.is_clean() => {
                tracing::warn!(
                    processed_matches = result.processed_matches,
                    updated_scores = result.updated_scores,
                    errors = ?result.errors,
                    "Settlement finished with errors"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Settlement run failed, will retry");
            }
        }
    }
}

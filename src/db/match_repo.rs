use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::Match;

const MATCH_COLUMNS: &str =
    "id, tournament_id, home_team, away_team, match_datetime, status, result, settled";

/// Get all finished matches with a result that have not been settled yet.
pub async fn get_unsettled_finished_matches(pool: &PgPool) -> Result<Vec<Match>, StoreError> {
    let rows = sqlx::query_as::<_, Match>(&format!(
        r#"
        SELECT {MATCH_COLUMNS}
        FROM matches
        WHERE status = 'FINISHED' AND settled = false AND result IS NOT NULL
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a single match by id.
pub async fn get_match(pool: &PgPool, match_id: i64) -> Result<Option<Match>, StoreError> {
    let row = sqlx::query_as::<_, Match>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
    ))
    .bind(match_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Flip the settled flag. Only finished matches with a result can be settled,
/// and the flag is never cleared.
pub async fn mark_match_settled(pool: &PgPool, match_id: i64) -> Result<(), StoreError> {
    let updated = sqlx::query(
        r#"
        UPDATE matches
        SET settled = true, updated_at = NOW()
        WHERE id = $1 AND status = 'FINISHED' AND result IS NOT NULL
        "#,
    )
    .bind(match_id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated > 0 {
        return Ok(());
    }

    match get_match(pool, match_id).await? {
        Some(m) => Err(StoreError::Conflict(format!(
            "match {} is {} without a final result",
            m.id, m.status
        ))),
        None => Err(StoreError::NotFound(format!("match {match_id}"))),
    }
}

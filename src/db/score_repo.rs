use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{Score, Standing};

/// Get a user's accumulated score in a tournament, if any.
pub async fn get_score(
    pool: &PgPool,
    user_id: Uuid,
    tournament_id: i64,
) -> Result<Option<Score>, StoreError> {
    let row = sqlx::query_as::<_, Score>(
        r#"
        SELECT user_id, tournament_id, points, updated_at
        FROM scores
        WHERE user_id = $1 AND tournament_id = $2
        "#,
    )
    .bind(user_id)
    .bind(tournament_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert or overwrite the (user, tournament) score row with a new total.
pub async fn upsert_score(
    pool: &PgPool,
    user_id: Uuid,
    tournament_id: i64,
    points: i64,
    updated_at: DateTime<Utc>,
) -> Result<Score, StoreError> {
    let row = sqlx::query_as::<_, Score>(
        r#"
        INSERT INTO scores (user_id, tournament_id, points, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, tournament_id)
            DO UPDATE SET points = EXCLUDED.points, updated_at = EXCLUDED.updated_at
        RETURNING user_id, tournament_id, points, updated_at
        "#,
    )
    .bind(user_id)
    .bind(tournament_id)
    .bind(points)
    .bind(updated_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// All scores in a tournament, best first, ties by username.
pub async fn get_tournament_standings(
    pool: &PgPool,
    tournament_id: i64,
) -> Result<Vec<Standing>, StoreError> {
    let rows = sqlx::query_as::<_, Standing>(
        r#"
        SELECT s.user_id, p.username, s.points
        FROM scores s
        JOIN profiles p ON p.id = s.user_id
        WHERE s.tournament_id = $1
        ORDER BY s.points DESC, p.username ASC
        "#,
    )
    .bind(tournament_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

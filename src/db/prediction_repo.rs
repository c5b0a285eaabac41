use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::Prediction;

/// Get every prediction placed on a match.
pub async fn get_predictions_for_match(
    pool: &PgPool,
    match_id: i64,
) -> Result<Vec<Prediction>, StoreError> {
    let rows = sqlx::query_as::<_, Prediction>(
        r#"
        SELECT id, user_id, match_id, picked_result, created_at, updated_at
        FROM predictions
        WHERE match_id = $1
        ORDER BY id
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

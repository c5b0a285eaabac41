use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::Tournament;

pub async fn get_tournament(
    pool: &PgPool,
    tournament_id: i64,
) -> Result<Option<Tournament>, StoreError> {
    let row = sqlx::query_as::<_, Tournament>("SELECT id, name FROM tournaments WHERE id = $1")
        .bind(tournament_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::leaderboard::{self, LeaderboardPage, LeaderboardQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/tournaments/:tournament_id/leaderboard
pub async fn get(
    State(state): State<AppState>,
    tournament_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> Result<Json<LeaderboardPage>, AppError> {
    let Path(tournament_id) = tournament_id
        .map_err(|_| AppError::BadRequest("tournament_id must be a positive integer".into()))?;
    let Query(params) =
        params.map_err(|e| AppError::BadRequest(format!("Invalid query parameters: {e}")))?;

    let query = LeaderboardQuery::parse(tournament_id, params.limit, params.offset)?;
    let page = leaderboard::get_leaderboard(state.store.as_ref(), query).await?;

    Ok(Json(page))
}

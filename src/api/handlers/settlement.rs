use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::models::SettlementResult;
use crate::services::settlement;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SettleRequest {
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct SettleResponse {
    pub success: bool,
    pub dry_run: bool,
    #[serde(flatten)]
    pub result: SettlementResult,
}

/// An empty or unparsable body means a live run. A JSON body with a
/// malformed `dry_run` is rejected.
fn parse_request(body: &[u8]) -> Result<SettleRequest, AppError> {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return Ok(SettleRequest::default());
    };

    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// POST /api/admin/settle: settle every finished, unsettled match.
pub async fn settle(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let SettleRequest { dry_run } = parse_request(&body)?;

    tracing::info!(dry_run, "Settlement triggered via admin API");

    let _guard = state.settle_lock.lock().await;

    match settlement::settle(state.store.as_ref(), dry_run).await {
        Ok(result) => Ok((
            StatusCode::OK,
            Json(SettleResponse {
                success: true,
                dry_run,
                result,
            }),
        )
            .into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Settlement failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to settle matches",
                    "message": e.to_string(),
                })),
            )
                .into_response())
        }
    }
}

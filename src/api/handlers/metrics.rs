use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics::gauge;

use crate::AppState;

/// GET /metrics: Prometheus scrape endpoint.
///
/// Also reports whether a settlement run currently holds the settle lock.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    let running = state.settle_lock.try_lock().is_err();
    gauge!("settlement_in_progress").set(if running { 1.0 } else { 0.0 });

    state.metrics_handle.run_upkeep();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], state.metrics_handle.render())
}

//! Dashboard metrics endpoint.

use axum::Json;
use axum::extract::State;

use sc_protocol::ChatMetrics;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/metrics: chat and escalation totals with mean confidence.
pub async fn get_metrics(State(state): State<AppState>) -> ApiResult<Json<ChatMetrics>> {
    Ok(Json(state.store.metrics().await?))
}

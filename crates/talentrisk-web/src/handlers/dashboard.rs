//! Dashboard aggregates.

use axum::{extract::State, response::IntoResponse};
use talentrisk_common::ApiError;
use talentrisk_scorer::analytics;

use crate::handlers::{sample_on_failure, ApiResponse};
use crate::state::SharedState;

/// GET /api/dashboard/metrics
pub async fn dashboard_metrics(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let (metrics, fallback) = match state.repo.metrics().await {
        Ok(metrics) => (metrics, false),
        Err(err) => {
            let sample = sample_on_failure(&state, err, "dashboard metrics")?;
            (analytics::summarize(&sample), true)
        }
    };
    Ok(ApiResponse::ok(metrics).fallback(fallback))
}

//! Liveness and dependency status.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::state::SharedState;

/// GET /api/health
///
/// Always 200 so load balancers keep routing while the fallback roster is
/// being served; `status` is "degraded" when the store is unreachable.
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let database = match state.repo.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "health check: store unreachable");
            false
        }
    };

    Json(json!({
        "success": true,
        "status": if database { "ok" } else { "degraded" },
        "storage": state.repo.backend(),
        "database": database,
        "uptimeSeconds": state.uptime_secs(),
        "version": env!("CARGO_PKG_VERSION"),
        "activeConnections": state.active_connections(),
        "timestamp": Utc::now(),
    }))
}

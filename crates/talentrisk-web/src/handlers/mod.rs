//! HTTP handlers for all API routes.
//!
//! Successful responses share one envelope, `{"success": true, "data": ...}`,
//! with endpoint-specific extras (`count`, `threshold`, `fallback`) alongside.
//! Errors render through [`ApiError`].

pub mod dashboard;
pub mod employees;
pub mod health;
pub mod risk;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use talentrisk_common::{ApiError, Employee};
use talentrisk_db::DbError;

use crate::state::AppState;

pub struct ApiResponse {
    status: StatusCode,
    body: Map<String, Value>,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(data: T) -> Self {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(true));
        body.insert("data".to_string(), json!(data));
        Self { status: StatusCode::OK, body }
    }

    pub fn created<T: Serialize>(data: T) -> Self {
        Self { status: StatusCode::CREATED, ..Self::ok(data) }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    /// Mark the payload as sample data served in place of the store.
    pub fn fallback(self, used: bool) -> Self {
        if used { self.with("fallback", true) } else { self }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(Value::Object(self.body))).into_response()
    }
}

/// Turn a failed read into the sample roster when the store itself is down
/// and fallback is enabled; otherwise pass the error through. The roster is
/// already ordered highest score first, so callers only filter and truncate.
pub(crate) fn sample_on_failure(
    state: &AppState,
    err: DbError,
    operation: &str,
) -> Result<Vec<Employee>, ApiError> {
    if err.is_store_failure() && state.config.api.fallback_to_sample_data {
        tracing::warn!(error = %err, operation, "store unavailable, serving sample data");
        Ok(state.repo.sample_roster())
    } else {
        Err(err.into())
    }
}

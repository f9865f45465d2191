use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TalentRiskError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Unknown weight profile: {0}")]
    UnknownProfile(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TalentRiskError>;

/// Error returned from HTTP handlers.
///
/// Every variant renders as `{"success": false, "error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, "request failed: {}", self);
        }
        (status, Json(json!({ "success": false, "error": self.to_string() }))).into_response()
    }
}

impl From<TalentRiskError> for ApiError {
    fn from(err: TalentRiskError) -> Self {
        match err {
            TalentRiskError::Validation(msg) => ApiError::BadRequest(msg),
            TalentRiskError::UnknownProfile(name) => {
                ApiError::BadRequest(format!("Unknown weight profile: {}", name))
            }
            TalentRiskError::EmployeeNotFound(id) => {
                ApiError::NotFound(format!("Employee {} not found", id))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let api: ApiError = TalentRiskError::Validation("name is required".into()).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.to_string(), "name is required");
    }

    #[test]
    fn test_not_found_mapping() {
        let api: ApiError = TalentRiskError::EmployeeNotFound("abc".into()).into();
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_config_maps_to_internal() {
        let api: ApiError = TalentRiskError::Config("bad".into()).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

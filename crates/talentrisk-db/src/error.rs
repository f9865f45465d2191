//! Storage error types.

use mongodb::error::{ErrorKind, WriteFailure};
use talentrisk_common::{ApiError, TalentRiskError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

/// MongoDB duplicate key error code.
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("MongoDB error: {0}")]
    Mongo(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Employee not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Domain(#[from] TalentRiskError),
}

impl DbError {
    /// True for failures of the backend itself rather than of the request.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, DbError::Mongo(_) | DbError::Unavailable(_))
    }
}

impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                DbError::Unavailable(err.to_string())
            }
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
                DbError::Duplicate(write.message.clone())
            }
            _ => DbError::Mongo(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => ApiError::NotFound(format!("Employee {} not found", id)),
            DbError::Duplicate(msg) => ApiError::BadRequest(format!("Duplicate entry: {}", msg)),
            DbError::Domain(inner) => ApiError::from(inner),
            DbError::Unavailable(msg) | DbError::Mongo(msg) => {
                ApiError::Unavailable(format!("Database unavailable: {}", msg))
            }
        }
    }
}

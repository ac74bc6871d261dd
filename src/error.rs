use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::ERR_ACCESS_DENIED;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Database open error: {0}")]
    DatabaseOpen(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("No valid learner identity")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid game type: {0}")]
    InvalidGameType(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Learner already exists")]
    LearnerAlreadyExists,

    #[error("Learner not found")]
    LearnerNotFound,
}

impl AppError {
    /// True for I/O, transaction and codec failures that the caller may retry
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::DatabaseOpen(_)
                | AppError::Transaction(_)
                | AppError::Table(_)
                | AppError::Storage(_)
                | AppError::Commit(_)
                | AppError::Serialization(_)
                | AppError::Deserialization(_)
                | AppError::TaskJoin(_)
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_storage_failure() {
            tracing::error!("Storage failure: {:?}", self);
            let body = Json(json!({
                "status": "error",
                "error": "Storage failure"
            }));
            return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        }

        let (status, error_message) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "No valid learner identity".to_string(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, ERR_ACCESS_DENIED.to_string()),
            AppError::InvalidGameType(ref name) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid game type: {}", name),
            ),
            AppError::MalformedPayload(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::LearnerAlreadyExists => {
                (StatusCode::CONFLICT, "Learner already exists".to_string())
            }
            AppError::LearnerNotFound => (StatusCode::NOT_FOUND, "Learner not found".to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "status": "error",
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_not_storage_failures() {
        assert!(!AppError::Unauthenticated.is_storage_failure());
        assert!(!AppError::InvalidGameType("chess".to_string()).is_storage_failure());
        assert!(!AppError::MalformedPayload("stage".to_string()).is_storage_failure());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidGameType("chess".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::LearnerAlreadyExists.into_response().status(),
            StatusCode::CONFLICT
        );
    }
}

// errors.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::user::UserId;

/// Errors surfaced by the messaging operations
#[derive(Error, Debug)]
pub enum AppError {
    /// Referenced message or user does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A send targeted a user the directory does not know
    #[error("Receiver {0} not found")]
    ReceiverNotFound(UserId),

    /// Caller is not allowed to touch the resource
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Missing or invalid bearer token
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Failed to get client from pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::ReceiverNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_distinct_statuses() {
        assert_eq!(
            AppError::NotFound("Message 7".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::ReceiverNotFound(9).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::PermissionDenied("not the receiver".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }
}

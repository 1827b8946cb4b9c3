//! Error types shared by the service.
//!
//! Secondary-store faults are client errors carrying the database message.
//! Primary-store faults are not translated: they surface as the generic
//! internal-error response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ErrorDetail;

/// Result alias used throughout the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Primary store unreachable or credentials rejected.
    #[error("primary store connection failed: {0}")]
    DatabaseConnection(String),

    /// Query fault on the primary store.
    #[error("primary store query failed: {0}")]
    DatabaseQuery(String),

    /// Any fault raised by the secondary store.
    #[error("{0}")]
    SecondaryQuery(String),

    /// The requested capability is disabled by configuration.
    #[error("{0}")]
    Forbidden(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Wraps a secondary-store fault, keeping the database's own message.
    pub fn secondary(err: sqlx::Error) -> Self {
        AppError::SecondaryQuery(describe(&err))
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SecondaryQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::DatabaseConnection(_) | AppError::DatabaseQuery(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Text of a driver error, preferring the message reported by the database.
pub fn describe(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db_err) => db_err.message().to_string(),
        None => err.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::SecondaryQuery(detail) | AppError::Forbidden(detail) => {
                (status, Json(ErrorDetail { detail })).into_response()
            }
            // Connection failures are already logged where they happen.
            AppError::DatabaseConnection(_) => (status, "Internal Server Error").into_response(),
            other => {
                tracing::error!(error = %other, "unhandled request fault");
                (status, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::SecondaryQuery("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::DatabaseConnection("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DatabaseQuery("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_describe_plain_error() {
        let err = sqlx::Error::RowNotFound;
        assert_eq!(describe(&err), err.to_string());
    }

    #[test]
    fn test_primary_faults_hide_details() {
        let response = AppError::DatabaseQuery("relation does not exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Error handling module for the interview-prep backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and JSON bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const CONFLICT: &str = "CONFLICT";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Message reported when no `DATABASE_URL` was supplied.
pub const DATABASE_NOT_CONFIGURED: &str = "DATABASE_URL is not configured";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// No store configured, or configuration could not be parsed
    Configuration(String),
    /// Resource not found
    NotFound(String),
    /// Missing required field or out-of-domain value
    Validation(String),
    /// Request body could not be read as JSON
    BadRequest(String),
    /// Uniqueness conflict
    Conflict(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Error for an unconfigured store.
    pub fn not_configured() -> Self {
        AppError::Configuration(DATABASE_NOT_CONFIGURED.to_string())
    }

    /// Error for a direct lookup that found nothing.
    pub fn not_found() -> Self {
        AppError::NotFound("Not found".to_string())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Conflict(_) => codes::CONFLICT,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Configuration(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let unique_violation = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if unique_violation {
            return AppError::Conflict(format!("Already exists: {}", err));
        }
        AppError::Database(format!("Database error: {}", err))
    }
}

/// JSON error body.
///
/// Missing-resource and configuration failures are reported under `message`,
/// everything else under `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let text = error.message();
        let (error_text, message) = match error {
            AppError::Configuration(_) | AppError::NotFound(_) => (None, Some(text)),
            _ => (Some(text), None),
        };

        Self {
            error: error_text,
            message,
            code: error.error_code().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self.message());
        } else {
            tracing::debug!(code = self.error_code(), "{}", self.message());
        }

        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_uses_message_field() {
        let (status, body) = body_json(AppError::not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not found");
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn unconfigured_store_is_500_with_message() {
        let (status, body) = body_json(AppError::not_configured()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "DATABASE_URL is not configured");
    }

    #[tokio::test]
    async fn validation_uses_error_field() {
        let (status, body) =
            body_json(AppError::Validation("title is required".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title is required");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body.get("message").is_none());
    }

    #[test]
    fn database_errors_are_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), codes::DATABASE_ERROR);
        assert!(err.message().starts_with("Database error"));
    }

    #[test]
    fn conflict_is_409() {
        let err = AppError::Conflict("repoName taken".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "CONFLICT: repoName taken");
    }
}

//! Error types for Snippetier
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for the `{"error": "..."}` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Row not found (404 when it escapes a handler unconverted)
    #[error("Resource not found")]
    NotFound,

    /// Identity missing (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Malformed id, body or query parameter (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Generic storage failure reported by a handler (500)
    #[error("{0}")]
    Storage(String),

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// GitHub returned something unusable (502)
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// Status code, client-facing message and metric label for this error
    fn parts(&self) -> (StatusCode, String, &'static str) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string(), "not_found"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), "unauthorized"),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "validation"),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                "database",
            ),
            AppError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "storage"),
            AppError::HttpClient(_) => (
                StatusCode::BAD_GATEWAY,
                "GitHub request failed".to_string(),
                "http_client",
            ),
            AppError::GitHub(msg) => (StatusCode::BAD_GATEWAY, msg.clone(), "github"),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "config"),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "internal",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message, error_type) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        crate::metrics::ERRORS_TOTAL
            .with_label_values(&[error_type])
            .inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_message() {
        let (status, message, _) = AppError::Validation("Invalid snippet ID".into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid snippet ID");
    }

    #[test]
    fn database_errors_are_opaque() {
        let (status, message, _) = AppError::Database(sqlx::Error::RowNotFound).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Database error");
    }

    #[test]
    fn github_failures_are_bad_gateway() {
        let (status, _, label) = AppError::GitHub("bad body".into()).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(label, "github");
    }

    #[tokio::test]
    async fn response_body_is_error_envelope() {
        let response = AppError::Storage("Failed to save snippet".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Failed to save snippet" }));
    }
}

//! Error types for tutor-daemon.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tutor_types::WorkflowError;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors.
///
/// Revision exhaustion never appears here: the workflow returns a
/// best-effort 200 payload for that case.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The model could not produce schema-conforming output
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The model capability was unreachable
    #[error("Upstream model error: {0}")]
    Upstream(String),
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::GenerationFailed { .. } => ApiError::Generation(err.to_string()),
            WorkflowError::Upstream(detail) => ApiError::Upstream(detail),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Generation(_) => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_taxonomy_maps_to_5xx() {
        assert_eq!(
            ApiError::Generation("g".to_string()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Upstream("u".to_string()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Validation("v".to_string()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn workflow_errors_convert() {
        let err: ApiError = WorkflowError::Upstream("timeout".to_string()).into();
        assert!(matches!(err, ApiError::Upstream(_)));

        let err: ApiError = WorkflowError::GenerationFailed {
            attempts: 3,
            reason: "bad schema".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Generation(_)));
    }
}

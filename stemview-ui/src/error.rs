//! Error types for stemview-ui
//!
//! `UploadError` covers one upload attempt end to end; `ApiError` is the HTTP
//! mapping used by the axum handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything that can end an upload attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No file selected; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// Another upload is still waiting for the backend
    #[error("An upload is already in progress")]
    InFlight,

    /// DNS, connection refused, timeout, ...
    #[error("Network error: {0}")]
    Transport(String),

    /// Backend answered with a non-2xx status; body kept verbatim
    #[error("HTTP error: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    /// Body was not JSON or did not match the response contract
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl UploadError {
    /// Short machine-readable kind, used in logs and API error codes
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "VALIDATION",
            UploadError::InFlight => "IN_FLIGHT",
            UploadError::Transport(_) => "TRANSPORT",
            UploadError::HttpStatus { .. } => "HTTP_STATUS",
            UploadError::Decode(_) => "DECODE",
        }
    }

    /// Errors raised before any request was sent
    pub fn is_rejection(&self) -> bool {
        matches!(self, UploadError::Validation(_) | UploadError::InFlight)
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - upload already running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(msg) => ApiError::BadRequest(msg),
            UploadError::InFlight => ApiError::Conflict(UploadError::InFlight.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

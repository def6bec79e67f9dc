use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lingosheet_core::error::CoreError;
use lingosheet_events::JobStoreError;

/// Message returned for a missing, malformed or unknown job id.
pub const INVALID_TRANSLATION_ID: &str = "Invalid translation ID";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `lingosheet_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The multipart body could not be read (malformed or too large).
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The `id` query parameter names no known job.
    #[error("Invalid translation ID")]
    InvalidTranslationId,

    /// A requested output file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The server is shutting down and takes no new work.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JobStoreError> for AppError {
    fn from(err: JobStoreError) -> Self {
        match err {
            JobStoreError::NotFound(_) => AppError::InvalidTranslationId,
            JobStoreError::DuplicateId(id) => {
                AppError::InternalError(format!("Job id {id} allocated twice"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Multipart(err) => {
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                (status, code, err.body_text())
            }
            AppError::InvalidTranslationId => (
                StatusCode::BAD_REQUEST,
                "INVALID_TRANSLATION_ID",
                INVALID_TRANSLATION_ID.to_string(),
            ),
            AppError::FileNotFound(name) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("File not found: {name}"),
            ),
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

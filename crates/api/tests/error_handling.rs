//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server is
//! involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use lingosheet_api::error::AppError;
use lingosheet_core::error::CoreError;
use lingosheet_core::types::new_job_id;
use lingosheet_events::JobStoreError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("No file selected".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "No file selected");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("No file provided".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "No file provided");
}

// ---------------------------------------------------------------------------
// Test: unknown job ids map to 400 with the fixed message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_returns_invalid_translation_id() {
    let err = AppError::from(JobStoreError::NotFound(new_job_id()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_TRANSLATION_ID");
    assert_eq!(json["error"], "Invalid translation ID");
}

// ---------------------------------------------------------------------------
// Test: a duplicate job id is an internal error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_job_id_returns_500() {
    let err = AppError::from(JobStoreError::DuplicateId(new_job_id()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

// ---------------------------------------------------------------------------
// Test: AppError::FileNotFound maps to 404 naming the file
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_not_found_returns_404() {
    let err = AppError::FileNotFound("translated_1_x_book.xlsx".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "File not found: translated_1_x_book.xlsx");
}

// ---------------------------------------------------------------------------
// Test: AppError::Unavailable maps to 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unavailable_returns_503() {
    let err = AppError::Unavailable("Server is shutting down".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(json["error"], "Server is shutting down");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("disk full at /srv/uploads".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

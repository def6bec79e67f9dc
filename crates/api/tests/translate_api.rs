//! Integration tests for job submission (`POST /translate`).

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, build_test_app, multipart_body, submit, translate_request};
use lingosheet_core::types::parse_job_id;
use lingosheet_events::JobStatus;
use lingosheet_providers::fake::FakeTranslator;
use lingosheet_spreadsheet::test_util::{xlsx, Cell, Sheet};

fn workbook() -> Vec<u8> {
    xlsx(&[Sheet {
        name: "Sheet1",
        cells: vec![Cell::text("A1", "Hello", None), Cell::text("A2", "World", None)],
        merges: vec![],
    }])
}

async fn assert_bad_request(body: Vec<u8>, expected: &str) {
    let app = build_test_app(FakeTranslator::new());
    let response = app.send(translate_request(body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], expected);
    assert!(json["code"].is_string());
    assert_eq!(app.state.job_store.len().await, 0);
}

// ---------------------------------------------------------------------------
// Test: validation failures are rejected before a job exists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_file_part_is_rejected() {
    let body = multipart_body(&[("target_language", "fr")], None);
    assert_bad_request(body, "No file provided").await;
}

#[tokio::test]
async fn empty_file_name_is_rejected() {
    let body = multipart_body(&[("provider", "fake")], Some(("", &b"data"[..])));
    assert_bad_request(body, "No file selected").await;
}

#[tokio::test]
async fn non_excel_upload_is_rejected() {
    let body = multipart_body(&[("provider", "fake")], Some(("notes.csv", &b"a,b"[..])));
    assert_bad_request(body, "Invalid file type. Please upload an Excel file").await;
}

#[tokio::test]
async fn unknown_provider_is_rejected() {
    let body = multipart_body(&[("provider", "deepl")], Some(("book.xlsx", workbook().as_slice())));
    assert_bad_request(body, "Unsupported provider: deepl").await;
}

#[tokio::test]
async fn provider_defaults_to_groq() {
    // Only the fake provider is registered, so the default is unknown here.
    let body = multipart_body(&[], Some(("book.xlsx", workbook().as_slice())));
    assert_bad_request(body, "Unsupported provider: groq").await;
}

// ---------------------------------------------------------------------------
// Test: a valid submission returns immediately with a job id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_submission_returns_translation_id_without_waiting() {
    let app = build_test_app(FakeTranslator::new().with_delay(Duration::from_millis(500)));
    let body = multipart_body(
        &[("target_language", "de"), ("provider", "fake")],
        Some(("Q3 report.xlsx", workbook().as_slice())),
    );

    let response = app.send(translate_request(body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Translation started");

    let id = parse_job_id(json["translation_id"].as_str().unwrap()).unwrap();
    let snapshot = app.state.job_store.snapshot(id).await.unwrap();
    assert!(!snapshot.status.is_terminal());

    let upload = app.config().upload_dir.join(id.to_string()).join("Q3_report.xlsx");
    assert!(upload.exists(), "upload should be stored under the job directory");
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_ids_and_directories() {
    let app = build_test_app(FakeTranslator::new());
    let first = submit(&app, "book.xlsx", &workbook(), "fr").await;
    let second = submit(&app, "book.xlsx", &workbook(), "fr").await;

    assert_ne!(first, second);
    assert_eq!(app.state.job_store.len().await, 2);
}

#[tokio::test]
async fn health_reports_active_jobs() {
    let app = build_test_app(FakeTranslator::new().with_delay(Duration::from_millis(300)));
    let id = submit(&app, "book.xlsx", &workbook(), "fr").await;

    let json = body_json(app.get("/health").await).await;
    assert_eq!(json["active_jobs"], 1);

    let id = parse_job_id(&id).unwrap();
    assert!(matches!(
        app.state.job_store.snapshot(id).await.unwrap().status,
        JobStatus::Pending | JobStatus::Running
    ));
}

// ---------------------------------------------------------------------------
// Test: uploads above the body limit are refused
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_upload_is_refused() {
    let app = build_test_app(FakeTranslator::new());
    let huge = vec![0_u8; app.config().max_upload_bytes + 1];
    let body = multipart_body(&[("provider", "fake")], Some(("book.xlsx", huge.as_slice())));

    let response = app.send(translate_request(body)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.state.job_store.len().await, 0);
}

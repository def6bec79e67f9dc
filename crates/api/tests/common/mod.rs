#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lingosheet_api::config::ServerConfig;
use lingosheet_api::router::build_app_router;
use lingosheet_api::state::AppState;
use lingosheet_providers::fake::FakeTranslator;
use lingosheet_providers::ProviderRegistry;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "lingosheet-test-boundary";

/// Build a test `ServerConfig` rooted in `dir`.
///
/// Short heartbeat and no pacing so streaming tests run quickly.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        upload_dir: dir.join("uploads"),
        output_dir: dir.join("output"),
        max_upload_bytes: 1024 * 1024,
        max_concurrent_jobs: 2,
        translation_pacing: Duration::ZERO,
        sse_heartbeat: Duration::from_millis(50),
        job_retention: Duration::from_secs(3600),
        job_sweep_interval: Duration::from_secs(60),
    }
}

/// A router plus the state and scratch directory behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        get(self.router.clone(), uri).await
    }
}

/// Build the full application router with the production middleware stack.
///
/// `translator` is registered as the only provider, under `"fake"`.
pub fn build_test_app(translator: FakeTranslator) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let providers = ProviderRegistry::new().with(Arc::new(translator));
    let state = AppState::new(config.clone(), providers);
    let router = build_app_router(state.clone(), &config);
    TestApp { router, state, dir }
}

/// Issue a GET request against `app`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect the response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Collect an SSE response until the server closes it and parse every
/// `data:` line as JSON.
pub async fn sse_events(response: Response<Body>) -> Vec<Value> {
    let bytes = body_bytes(response).await;
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}

/// Encode a `multipart/form-data` body.
///
/// `file` is `(file name, contents)` for the `file` part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// `POST /translate` with a multipart body.
pub fn translate_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/translate")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Submit `workbook` for translation to `target` with the fake provider and
/// return the translation id.
pub async fn submit(app: &TestApp, file_name: &str, workbook: &[u8], target: &str) -> String {
    let body = multipart_body(
        &[("target_language", target), ("provider", "fake")],
        Some((file_name, workbook)),
    );
    let response = app.send(translate_request(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["translation_id"].as_str().unwrap().to_string()
}

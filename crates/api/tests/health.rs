//! Integration tests for the health check, catalogue endpoints and general
//! HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app};
use lingosheet_providers::fake::FakeTranslator;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_healthy_with_json() {
    let app = build_test_app(FakeTranslator::new());
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert_eq!(json["active_jobs"], 0);
}

// ---------------------------------------------------------------------------
// Test: GET / returns the API banner
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_returns_banner() {
    let app = build_test_app(FakeTranslator::new());
    let json = body_json(app.get("/").await).await;

    assert_eq!(json["message"], "Excel Translation API");
}

// ---------------------------------------------------------------------------
// Test: catalogue endpoints list languages and providers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn supported_languages_lists_codes_and_names() {
    let app = build_test_app(FakeTranslator::new());
    let json = body_json(app.get("/supported-languages").await).await;

    let languages = json["languages"].as_array().unwrap();
    let codes: Vec<_> = languages.iter().map(|l| l["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["es", "fr", "de", "it", "pt"]);
    assert_eq!(languages[1]["name"], "French");
}

#[tokio::test]
async fn providers_list_models() {
    let app = build_test_app(FakeTranslator::new());

    let json = body_json(app.get("/providers").await).await;
    let providers = json["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 4);
    assert!(providers
        .iter()
        .any(|p| p["name"] == "anthropic" && p["models"].as_array().unwrap().len() == 5));

    let json = body_json(app.get("/ai-providers").await).await;
    let ids: Vec<_> = json["providers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["groq", "anthropic", "openai", "google"]);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(FakeTranslator::new());
    let response = app.get("/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app(FakeTranslator::new());
    let response = app.get("/health").await;

    let id_str = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header")
        .to_str()
        .unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let app = build_test_app(FakeTranslator::new());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/translate")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers().get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

//! Static catalogue endpoints used by the browser client.

use axum::Json;
use serde_json::{json, Value};

use lingosheet_core::catalog::{AI_PROVIDERS, PROVIDER_MODELS, SUPPORTED_LANGUAGES};

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({ "message": "Excel Translation API" }))
}

/// GET /supported-languages
pub async fn supported_languages() -> Json<Value> {
    Json(json!({ "languages": SUPPORTED_LANGUAGES }))
}

/// GET /providers
///
/// Every provider with the full list of models it accepts.
pub async fn providers() -> Json<Value> {
    Json(json!({ "providers": PROVIDER_MODELS }))
}

/// GET /ai-providers
///
/// Display names and the recommended model per provider.
pub async fn ai_providers() -> Json<Value> {
    Json(json!({ "providers": AI_PROVIDERS }))
}

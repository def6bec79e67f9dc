pub mod health;
pub mod metadata;
pub mod translation;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                              API banner
/// /supported-languages           target languages offered by the UI
/// /providers                     providers with all accepted models
/// /ai-providers                  providers with display names
///
/// /translate                     submit a workbook (POST, multipart)
/// /translation-progress?id=      progress events (SSE)
/// /translation-status?id=        progress snapshot (JSON)
/// /download/{filename}           translated workbook
/// ```
///
/// `/health` is mounted separately by the app router.
pub fn app_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(metadata::router())
        .merge(translation::router(max_upload_bytes))
}

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{download, progress, translate};
use crate::state::AppState;

/// Translation job routes.
///
/// ```text
/// POST   /translate               -> start_translation
/// GET    /translation-progress    -> translation_progress
/// GET    /translation-status      -> translation_status
/// GET    /download/{filename}     -> download
/// ```
///
/// Only `/translate` accepts bodies up to `max_upload_bytes`.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/translate",
            post(translate::start_translation).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/translation-progress", get(progress::translation_progress))
        .route("/translation-status", get(progress::translation_status))
        .route("/download/{filename}", get(download::download))
}

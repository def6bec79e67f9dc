use axum::routing::get;
use axum::Router;

use crate::handlers::metadata;
use crate::state::AppState;

/// Catalogue routes.
///
/// ```text
/// GET    /                      -> index
/// GET    /supported-languages   -> supported_languages
/// GET    /providers             -> providers
/// GET    /ai-providers          -> ai_providers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(metadata::index))
        .route("/supported-languages", get(metadata::supported_languages))
        .route("/providers", get(metadata::providers))
        .route("/ai-providers", get(metadata::ai_providers))
}

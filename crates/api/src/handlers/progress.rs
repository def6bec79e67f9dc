//! Job progress: the SSE stream and the status snapshot.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use lingosheet_core::types::{parse_job_id, JobId};
use lingosheet_events::JobSnapshot;

use crate::error::{AppError, AppResult};
use crate::sse::progress_sse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// The `translation_id` returned by `POST /translate`.
    pub id: Option<String>,
}

impl ProgressQuery {
    /// A missing or malformed id is reported like an unknown one.
    fn job_id(&self) -> AppResult<JobId> {
        self.id
            .as_deref()
            .and_then(parse_job_id)
            .ok_or(AppError::InvalidTranslationId)
    }
}

/// GET /translation-progress?id=
///
/// Streams the job's progress events as `text/event-stream`. The id is
/// checked before the stream opens so an unknown job gets a plain 400.
pub async fn translation_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let id = query.job_id()?;
    let subscription = state.job_store.subscribe(id).await?;
    tracing::debug!(job_id = %id, "Progress stream opened");

    Ok(progress_sse(subscription, state.config.sse_heartbeat))
}

/// GET /translation-status?id=
///
/// Point-in-time view of a job, for clients that poll instead of streaming.
pub async fn translation_status(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<JobSnapshot>> {
    let id = query.job_id()?;
    Ok(Json(state.job_store.snapshot(id).await?))
}

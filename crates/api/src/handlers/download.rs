//! Serving translated workbooks: `GET /download/{filename}`.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;

use lingosheet_core::upload::{content_type_for, validate_download_name};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /download/{filename}
///
/// Streams a file from the output directory as an attachment. Only bare
/// file names are accepted.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    validate_download_name(&filename)?;
    let path = state.config.output_dir.join(&filename);

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::FileNotFound(filename));
        }
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };
    let metadata = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    if !metadata.is_file() {
        return Err(AppError::FileNotFound(filename));
    }

    tracing::info!(file = %filename, bytes = metadata.len(), "Serving translated workbook");

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
        (header::CONTENT_LENGTH, metadata.len().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

//! Job submission: `POST /translate`.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use lingosheet_core::catalog::{DEFAULT_PROVIDER, DEFAULT_TARGET_LANGUAGE};
use lingosheet_core::types::{new_job_id, JobId};
use lingosheet_core::upload::{sanitize_file_name, validate_upload_name};
use lingosheet_worker::{TranslationJob, WorkerError};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response of an accepted submission.
#[derive(Debug, Serialize)]
pub struct TranslationStarted {
    pub status: &'static str,
    pub message: &'static str,
    pub translation_id: JobId,
}

/// Fields of the submission form.
#[derive(Debug, Default)]
struct TranslateForm {
    /// `(client file name, contents)` of the `file` part.
    file: Option<(String, axum::body::Bytes)>,
    target_language: Option<String>,
    provider: Option<String>,
    model: Option<String>,
}

impl TranslateForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?;
                    form.file = Some((file_name, data));
                }
                "target_language" | "provider" | "model" => {
                    let value = field.text().await?;
                    let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                    match name.as_str() {
                        "target_language" => form.target_language = value,
                        "provider" => form.provider = value,
                        _ => form.model = value,
                    }
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown form field");
                }
            }
        }
        Ok(form)
    }
}

/// POST /translate
///
/// Validate the upload, store it in a per-job directory, register the job
/// and start it in the background. Returns before any translation happens.
pub async fn start_translation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<TranslationStarted>> {
    let form = TranslateForm::read(multipart).await?;

    let (file_name, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    validate_upload_name(&file_name)?;

    let provider = form.provider.unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    state
        .providers
        .get(&provider)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let target_language = form
        .target_language
        .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());

    let id = new_job_id();
    let job = TranslationJob::new(
        id,
        &state.config.upload_dir,
        &state.config.output_dir,
        sanitize_file_name(&file_name),
        target_language,
        provider,
        form.model,
    );

    accept(&state, job, &data).await?;

    tracing::info!(
        job_id = %id,
        file = %file_name,
        bytes = data.len(),
        "Translation job submitted",
    );

    Ok(Json(TranslationStarted {
        status: "success",
        message: "Translation started",
        translation_id: id,
    }))
}

/// Store the upload, register the job and hand it to the runner.
///
/// The upload is removed again when the job cannot be registered.
async fn accept(state: &AppState, job: TranslationJob, data: &[u8]) -> AppResult<()> {
    if let Err(e) = store_upload(&job, data).await {
        job.cleanup_input().await;
        return Err(AppError::InternalError(format!("Failed to store upload: {e}")));
    }

    let sender = match state.job_store.create(job.id).await {
        Ok(sender) => sender,
        Err(e) => {
            job.cleanup_input().await;
            return Err(e.into());
        }
    };
    // A refused launch fails the job and removes its upload itself.
    state.runner.launch(job, sender).await.map_err(|e| match e {
        WorkerError::ShuttingDown => AppError::Unavailable(e.to_string()),
        other => AppError::InternalError(other.to_string()),
    })
}

async fn store_upload(job: &TranslationJob, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&job.input_dir).await?;
    tokio::fs::write(&job.input_path, data).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use lingosheet_providers::fake::{FakeTranslator, FAKE_PROVIDER};
    use lingosheet_providers::ProviderRegistry;

    use super::*;
    use crate::config::ServerConfig;

    fn state(dir: &std::path::Path) -> AppState {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            shutdown_timeout_secs: 5,
            upload_dir: dir.join("uploads"),
            output_dir: dir.join("output"),
            max_upload_bytes: 1024,
            max_concurrent_jobs: 1,
            translation_pacing: Duration::ZERO,
            sse_heartbeat: Duration::from_secs(15),
            job_retention: Duration::from_secs(3600),
            job_sweep_interval: Duration::from_secs(60),
        };
        AppState::new(config, ProviderRegistry::new().with(Arc::new(FakeTranslator::new())))
    }

    #[tokio::test]
    async fn upload_is_removed_when_job_id_is_taken() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());
        let id = new_job_id();
        let _existing = state.job_store.create(id).await.unwrap();

        let job = TranslationJob::new(
            id,
            &state.config.upload_dir,
            &state.config.output_dir,
            "book.xlsx",
            "fr",
            FAKE_PROVIDER,
            None,
        );
        let result = accept(&state, job.clone(), b"workbook bytes").await;

        assert!(matches!(result, Err(AppError::InternalError(_))), "{result:?}");
        assert!(!job.input_dir.exists());
    }
}

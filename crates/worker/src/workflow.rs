//! The translation workflow for a single job.
//!
//! Event sequence for a successful job:
//!
//! 1. `Progress{0, "Starting translation..."}`
//! 2. `Progress{0, "Analyzing file contents..."}`
//! 3. per cell `i` of `n`: `Progress{floor(100 * i / n), "Translating cell ..."}`
//! 4. `Progress{95, "Saving translated file..."}`
//! 5. `Completed{100, "Translation completed!", <output file name>}`
//!
//! Any error, including a panic, ends the job with a single `Failed` event.
//! The uploaded input is deleted before the terminal event is published.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use lingosheet_core::language::detect_language;
use lingosheet_core::progress::{
    cell_message, percent_of, MSG_ANALYZING, MSG_COMPLETED, MSG_NOTHING_TO_TRANSLATE, MSG_SAVING,
    SAVING_PERCENT,
};
use lingosheet_events::ProgressSender;
use lingosheet_providers::{ProviderRegistry, TranslationRequest};
use lingosheet_spreadsheet::Workbook;

use crate::error::WorkerError;
use crate::job::TranslationJob;

/// Prefix of every failure message reported to clients.
pub const FAILURE_PREFIX: &str = "Translation failed";

/// Result of a job that ran to completion.
#[derive(Debug)]
struct Completion {
    message: &'static str,
    file_name: String,
}

/// Run `job` and publish exactly one terminal event through `sender`.
pub async fn process(
    job: TranslationJob,
    mut sender: ProgressSender,
    providers: &ProviderRegistry,
    pacing: Duration,
) {
    sender.start().await;
    tracing::info!(
        job_id = %job.id,
        provider = %job.provider,
        target_language = %job.target_language,
        "Translation started",
    );

    let outcome = AssertUnwindSafe(translate(&job, &mut sender, providers, pacing))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(WorkerError::Panicked(panic_message(panic.as_ref()))));

    job.cleanup_input().await;

    match outcome {
        Ok(done) => {
            tracing::info!(job_id = %job.id, file = %done.file_name, "Translation completed");
            sender.complete(done.message, done.file_name).await;
        }
        Err(e) => {
            tracing::error!(job_id = %job.id, error = %e, "Translation failed");
            sender.fail(format!("{FAILURE_PREFIX}: {e}")).await;
        }
    }
}

async fn translate(
    job: &TranslationJob,
    sender: &mut ProgressSender,
    providers: &ProviderRegistry,
    pacing: Duration,
) -> Result<Completion, WorkerError> {
    let translator = providers.get(&job.provider)?;

    let input = job.input_path.clone();
    let mut workbook = tokio::task::spawn_blocking(move || Workbook::open(&input)).await??;
    sender.progress(0, MSG_ANALYZING).await;

    let cells = workbook.translatable_cells().to_vec();
    let total = cells.len();
    tracing::debug!(job_id = %job.id, cells = total, "Workbook analysed");

    for (index, cell) in cells.into_iter().enumerate() {
        sender
            .progress(percent_of(index, total), cell_message(index, total, &cell.sheet))
            .await;

        let request = TranslationRequest {
            text: &cell.text,
            source_language: detect_language(&cell.text),
            target_language: &job.target_language,
            model: job.model.as_deref(),
        };
        let translated = translator
            .translate(&request)
            .await
            .map_err(|source| WorkerError::CellTranslation {
                cell: cell.coordinate.clone(),
                sheet: cell.sheet.clone(),
                source,
            })?;
        workbook.set_cell_text(index, translated)?;

        tokio::time::sleep(pacing).await;
    }

    sender.progress(SAVING_PERCENT, MSG_SAVING).await;
    tokio::fs::create_dir_all(&job.output_dir).await?;
    let file_name = job.output_name(chrono::Utc::now().timestamp());
    let output = job.output_dir.join(&file_name);
    tokio::task::spawn_blocking(move || workbook.save(&output)).await??;

    Ok(Completion {
        message: if total == 0 {
            MSG_NOTHING_TO_TRANSLATE
        } else {
            MSG_COMPLETED
        },
        file_name,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Description of one queued translation.

use std::path::{Path, PathBuf};

use lingosheet_core::types::JobId;
use lingosheet_core::upload::{job_upload_dir, job_upload_path, output_file_name};

/// Everything a worker needs to translate one uploaded workbook.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub id: JobId,
    /// Per-job upload directory; removed once the job ends.
    pub input_dir: PathBuf,
    /// The uploaded workbook inside `input_dir`.
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Sanitized upload name, reused for the output file.
    pub file_name: String,
    pub target_language: String,
    pub provider: String,
    /// Model override; `None` uses the provider default.
    pub model: Option<String>,
}

impl TranslationJob {
    /// Lay out the paths for job `id` under the given roots.
    pub fn new(
        id: JobId,
        upload_root: &Path,
        output_dir: &Path,
        file_name: impl Into<String>,
        target_language: impl Into<String>,
        provider: impl Into<String>,
        model: Option<String>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            id,
            input_dir: job_upload_dir(upload_root, id),
            input_path: job_upload_path(upload_root, id, &file_name),
            output_dir: output_dir.to_path_buf(),
            file_name,
            target_language: target_language.into(),
            provider: provider.into(),
            model: model.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Output file name for a save happening at `unix_timestamp`.
    pub fn output_name(&self, unix_timestamp: i64) -> String {
        output_file_name(unix_timestamp, self.id, &self.file_name)
    }

    /// Delete the uploaded workbook and its per-job directory.
    ///
    /// Failures are logged, never returned.
    pub async fn cleanup_input(&self) {
        match tokio::fs::remove_dir_all(&self.input_dir).await {
            Ok(()) => {
                tracing::debug!(job_id = %self.id, dir = %self.input_dir.display(), "Removed job input");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    job_id = %self.id,
                    dir = %self.input_dir.display(),
                    error = %e,
                    "Failed to remove job input",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingosheet_core::types::new_job_id;

    #[test]
    fn paths_are_namespaced_by_job() {
        let id = new_job_id();
        let job = TranslationJob::new(
            id,
            Path::new("/tmp/up"),
            Path::new("/tmp/out"),
            "book.xlsx",
            "fr",
            "groq",
            Some("  ".to_string()),
        );

        assert_eq!(job.input_dir, Path::new("/tmp/up").join(id.to_string()));
        assert_eq!(job.input_path, job.input_dir.join("book.xlsx"));
        assert_eq!(job.model, None);
        assert_eq!(job.output_name(42), format!("translated_42_{id}_book.xlsx"));
    }

    #[tokio::test]
    async fn cleanup_removes_directory_and_tolerates_absence() {
        let root = tempfile::tempdir().unwrap();
        let job = TranslationJob::new(
            new_job_id(),
            root.path(),
            root.path(),
            "book.xlsx",
            "fr",
            "groq",
            None,
        );
        tokio::fs::create_dir_all(&job.input_dir).await.unwrap();
        tokio::fs::write(&job.input_path, b"x").await.unwrap();

        job.cleanup_input().await;
        assert!(!job.input_dir.exists());

        job.cleanup_input().await;
    }
}

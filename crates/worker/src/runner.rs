//! Owner of every in-flight translation job.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::Instrument;

use lingosheet_events::ProgressSender;
use lingosheet_providers::ProviderRegistry;

use crate::error::WorkerError;
use crate::job::TranslationJob;
use crate::workflow;

/// Default number of jobs translated at the same time.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
/// Default pause after each translated cell.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Tunables for the [`JobRunner`].
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Jobs allowed to run at once; the rest wait in `Pending`.
    pub max_concurrent_jobs: usize,
    /// Pause after each translated cell, to stay under provider rate limits.
    pub pacing: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            pacing: DEFAULT_PACING,
        }
    }
}

/// Spawns translation jobs and tracks them until they finish.
///
/// Cheap to clone; clones share the same tracker and permits.
#[derive(Clone)]
pub struct JobRunner {
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    providers: ProviderRegistry,
    pacing: Duration,
}

impl JobRunner {
    pub fn new(providers: ProviderRegistry, settings: WorkerSettings) -> Self {
        Self {
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(settings.max_concurrent_jobs.max(1))),
            providers,
            pacing: settings.pacing,
        }
    }

    /// Start `job` in the background and return immediately.
    ///
    /// The job stays `Pending` until a concurrency permit is free. After
    /// [`shutdown`](Self::shutdown) the job is failed on the spot and
    /// [`WorkerError::ShuttingDown`] is returned.
    pub async fn launch(
        &self,
        job: TranslationJob,
        sender: ProgressSender,
    ) -> Result<(), WorkerError> {
        if self.tracker.is_closed() {
            job.cleanup_input().await;
            sender
                .fail(format!("{}: {}", workflow::FAILURE_PREFIX, WorkerError::ShuttingDown))
                .await;
            return Err(WorkerError::ShuttingDown);
        }

        let permits = Arc::clone(&self.permits);
        let providers = self.providers.clone();
        let pacing = self.pacing;
        let span = tracing::info_span!("translation_job", job_id = %job.id);

        self.tracker.spawn(
            async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    job.cleanup_input().await;
                    sender.fail(WorkerError::ShuttingDown.to_string()).await;
                    return;
                };
                workflow::process(job, sender, &providers, pacing).await;
            }
            .instrument(span),
        );
        Ok(())
    }

    /// Jobs launched and not yet finished, queued ones included.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting jobs and wait up to `timeout` for running ones.
    ///
    /// Returns `false` if jobs were still running when the timeout expired.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(jobs = pending, "Waiting for in-flight translation jobs");
        }
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(jobs = self.tracker.len(), "Translation jobs still running at shutdown");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use assert_matches::assert_matches;
    use lingosheet_core::types::new_job_id;
    use lingosheet_events::{JobStatus, JobStore, ProgressEvent, Subscription};
    use lingosheet_providers::fake::{FakeTranslator, FAKE_PROVIDER};
    use lingosheet_spreadsheet::test_util::write_column;

    use super::*;

    fn runner(translator: FakeTranslator, max_concurrent_jobs: usize) -> JobRunner {
        JobRunner::new(
            ProviderRegistry::new().with(Arc::new(translator)),
            WorkerSettings {
                max_concurrent_jobs,
                pacing: Duration::ZERO,
            },
        )
    }

    async fn upload(root: &Path) -> TranslationJob {
        let job = TranslationJob::new(
            new_job_id(),
            root,
            root,
            "book.xlsx",
            "de",
            FAKE_PROVIDER,
            None,
        );
        tokio::fs::create_dir_all(&job.input_dir).await.unwrap();
        write_column(&job.input_path, "Sheet1", &["Hello", "World"]);
        job
    }

    async fn terminal_event(store: &JobStore, job: &TranslationJob) -> ProgressEvent {
        match store.subscribe(job.id).await.unwrap() {
            Subscription::Finished(event) => event,
            Subscription::Live { mut receiver, .. } => loop {
                let event = receiver.recv().await.unwrap();
                if event.is_terminal() {
                    break event;
                }
            },
        }
    }

    #[tokio::test]
    async fn launched_job_runs_to_completion() {
        let root = tempfile::tempdir().unwrap();
        let store = JobStore::new();
        let runner = runner(FakeTranslator::new(), 2);
        let job = upload(root.path()).await;
        let sender = store.create(job.id).await.unwrap();

        runner.launch(job.clone(), sender).await.unwrap();

        assert_matches!(terminal_event(&store, &job).await, ProgressEvent::Completed { .. });
        assert!(runner.shutdown(Duration::from_secs(5)).await);
        assert_eq!(runner.in_flight(), 0);
        assert!(!job.input_dir.exists());
    }

    #[tokio::test]
    async fn jobs_beyond_the_limit_wait_pending() {
        let root = tempfile::tempdir().unwrap();
        let store = JobStore::new();
        let slow = FakeTranslator::new().with_delay(Duration::from_millis(200));
        let runner = runner(slow, 1);

        let first = upload(root.path()).await;
        let second = upload(root.path()).await;
        runner
            .launch(first.clone(), store.create(first.id).await.unwrap())
            .await
            .unwrap();
        runner
            .launch(second.clone(), store.create(second.id).await.unwrap())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.snapshot(first.id).await.unwrap().status, JobStatus::Running);
        assert_eq!(store.snapshot(second.id).await.unwrap().status, JobStatus::Pending);
        assert_eq!(runner.in_flight(), 2);

        assert_matches!(terminal_event(&store, &second).await, ProgressEvent::Completed { .. });
        assert_eq!(store.snapshot(first.id).await.unwrap().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn launch_after_shutdown_fails_the_job() {
        let root = tempfile::tempdir().unwrap();
        let store = JobStore::new();
        let runner = runner(FakeTranslator::new(), 1);
        assert!(runner.shutdown(Duration::from_secs(1)).await);

        let job = upload(root.path()).await;
        let sender = store.create(job.id).await.unwrap();

        assert_matches!(runner.launch(job.clone(), sender).await, Err(WorkerError::ShuttingDown));
        assert_matches!(
            terminal_event(&store, &job).await,
            ProgressEvent::Failed { message } if message.contains("shutting down")
        );
        assert!(!job.input_dir.exists());
    }
}

//! In-memory registry of translation jobs and their progress channels.
//!
//! [`JobStore`] is cheaply cloneable (an `Arc` around a `RwLock`ed map) and
//! is shared between the submission endpoint, the workers and the progress
//! stream handlers.
//!
//! Every state change goes through the write lock and is published on the
//! job's broadcast channel while that lock is held. Subscribers take the
//! same lock, so a subscriber either sees the terminal state in the record
//! or is guaranteed to receive the terminal event on its channel.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use lingosheet_core::progress::MSG_STARTING;
use lingosheet_core::types::{JobId, Timestamp};

use crate::event::ProgressEvent;

/// Buffered events per job channel.
///
/// Sends never block; a consumer that falls further behind than this skips
/// the oldest events and resumes with newer ones.
pub const CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a job: `Pending -> Running -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("Job {0} already exists")]
    DuplicateId(JobId),

    #[error("Job {0} not found")]
    NotFound(JobId),
}

// ---------------------------------------------------------------------------
// Records and views
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct JobRecord {
    status: JobStatus,
    sender: broadcast::Sender<ProgressEvent>,
    percent: u8,
    message: Option<String>,
    result: Option<String>,
    error: Option<String>,
    terminal: Option<ProgressEvent>,
    created_at: Timestamp,
    finished_at: Option<Timestamp>,
}

impl JobRecord {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            status: JobStatus::Pending,
            sender,
            percent: 0,
            message: None,
            result: None,
            error: None,
            terminal: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Latest progress as an event, for priming late subscribers.
    fn progress_snapshot(&self) -> Option<ProgressEvent> {
        self.message
            .as_ref()
            .map(|message| ProgressEvent::progress(self.percent, message.clone()))
    }
}

/// Read-only view of a job, served by `GET /translation-status`.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub translation_id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub message: Option<String>,
    pub translated_file: Option<String>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

/// What a progress consumer gets when it attaches to a job.
#[derive(Debug)]
pub enum Subscription {
    /// The job is still pending or running.
    Live {
        receiver: broadcast::Receiver<ProgressEvent>,
        /// Most recent progress event, if the job has reported any.
        snapshot: Option<ProgressEvent>,
    },
    /// The job already reached a terminal state; only that event remains.
    Finished(ProgressEvent),
}

// ---------------------------------------------------------------------------
// JobStore
// ---------------------------------------------------------------------------

/// Thread-safe registry of jobs keyed by [`JobId`].
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job in `Pending` state and return its only sender.
    pub async fn create(&self, id: JobId) -> Result<ProgressSender, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&id) {
            return Err(JobStoreError::DuplicateId(id));
        }
        jobs.insert(id, JobRecord::new());
        tracing::debug!(job_id = %id, "Job registered");

        Ok(ProgressSender {
            store: self.clone(),
            id,
            last_percent: 0,
            finished: false,
        })
    }

    /// Attach a consumer to a job's event stream.
    pub async fn subscribe(&self, id: JobId) -> Result<Subscription, JobStoreError> {
        let jobs = self.jobs.read().await;
        let record = jobs.get(&id).ok_or(JobStoreError::NotFound(id))?;

        if let Some(terminal) = &record.terminal {
            return Ok(Subscription::Finished(terminal.clone()));
        }
        Ok(Subscription::Live {
            receiver: record.sender.subscribe(),
            snapshot: record.progress_snapshot(),
        })
    }

    /// Current state of a job.
    pub async fn snapshot(&self, id: JobId) -> Result<JobSnapshot, JobStoreError> {
        let jobs = self.jobs.read().await;
        let record = jobs.get(&id).ok_or(JobStoreError::NotFound(id))?;

        Ok(JobSnapshot {
            translation_id: id,
            status: record.status,
            progress: record.percent,
            message: record.message.clone(),
            translated_file: record.result.clone(),
            error: record.error.clone(),
            created_at: record.created_at,
            finished_at: record.finished_at,
        })
    }

    pub async fn contains(&self, id: JobId) -> bool {
        self.jobs.read().await.contains_key(&id)
    }

    /// Number of records currently held, finished ones included.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Number of jobs that are pending or running.
    pub async fn active_count(&self) -> usize {
        self.jobs
            .read()
            .await
            .values()
            .filter(|r| !r.status.is_terminal())
            .count()
    }

    /// Drop finished jobs whose terminal event is older than `cutoff`.
    ///
    /// Pending and running jobs are never evicted. Returns the number of
    /// records removed.
    pub async fn evict_finished_before(&self, cutoff: Timestamp) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, record| match record.finished_at {
            Some(finished_at) => finished_at >= cutoff,
            None => true,
        });
        before - jobs.len()
    }

    async fn mark_running(&self, id: JobId) {
        let mut jobs = self.jobs.write().await;
        if let Some(record) = jobs.get_mut(&id) {
            if record.status == JobStatus::Pending {
                record.status = JobStatus::Running;
            }
        }
    }

    /// Record `event` on the job and publish it to current subscribers.
    async fn publish(&self, id: JobId, event: ProgressEvent) {
        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(&id) else {
            tracing::warn!(job_id = %id, "Dropping event for unknown job");
            return;
        };
        if record.status.is_terminal() {
            tracing::warn!(job_id = %id, status = %record.status, "Dropping event for finished job");
            return;
        }

        match &event {
            ProgressEvent::Progress { percent, message } => {
                record.percent = *percent;
                record.message = Some(message.clone());
            }
            ProgressEvent::Completed {
                message,
                result_reference,
            } => {
                record.status = JobStatus::Completed;
                record.percent = lingosheet_core::progress::COMPLETE_PERCENT;
                record.message = Some(message.clone());
                record.result = Some(result_reference.clone());
            }
            ProgressEvent::Failed { message } => {
                record.status = JobStatus::Failed;
                record.error = Some(message.clone());
            }
            ProgressEvent::Heartbeat => return,
        }

        if event.is_terminal() {
            record.finished_at = Some(Utc::now());
            record.terminal = Some(event.clone());
        }

        // A send error only means nobody is listening right now.
        let _ = record.sender.send(event);
    }
}

// ---------------------------------------------------------------------------
// ProgressSender
// ---------------------------------------------------------------------------

/// Writing half of a job's channel, held by exactly one worker.
///
/// Not `Clone`. [`complete`](Self::complete) and [`fail`](Self::fail) take
/// `self`, so nothing can be sent after a terminal event. Dropping a sender
/// that never reached a terminal event (e.g. a panicking worker) fails the
/// job.
#[derive(Debug)]
pub struct ProgressSender {
    store: JobStore,
    id: JobId,
    last_percent: u8,
    finished: bool,
}

impl ProgressSender {
    pub fn job_id(&self) -> JobId {
        self.id
    }

    /// Move the job from `Pending` to `Running` and emit the first event.
    pub async fn start(&mut self) {
        self.store.mark_running(self.id).await;
        self.progress(0, MSG_STARTING).await;
    }

    /// Report progress. `percent` is clamped so it never goes backwards.
    pub async fn progress(&mut self, percent: u8, message: impl Into<String>) {
        let percent = percent.max(self.last_percent);
        self.last_percent = percent;
        self.store
            .publish(self.id, ProgressEvent::progress(percent, message))
            .await;
    }

    /// Emit the success event and close the job.
    pub async fn complete(mut self, message: impl Into<String>, result_reference: impl Into<String>) {
        self.finished = true;
        self.store
            .publish(self.id, ProgressEvent::completed(message, result_reference))
            .await;
    }

    /// Emit the failure event and close the job.
    pub async fn fail(mut self, message: impl Into<String>) {
        self.finished = true;
        self.store
            .publish(self.id, ProgressEvent::failed(message))
            .await;
    }
}

impl Drop for ProgressSender {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let store = self.store.clone();
        let id = self.id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::error!(job_id = %id, "Worker exited without a terminal event");
                handle.spawn(async move {
                    store
                        .publish(id, ProgressEvent::failed("Worker stopped unexpectedly"))
                        .await;
                });
            }
            Err(_) => {
                tracing::error!(job_id = %id, "Worker exited without a terminal event outside a runtime");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::sync::Arc;

use lingosheet_events::JobStore;
use lingosheet_providers::ProviderRegistry;
use lingosheet_worker::JobRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Status and event channel of every known translation job.
    pub job_store: JobStore,
    /// Executes translation jobs in the background.
    pub runner: JobRunner,
    /// Translation providers accepted by `POST /translate`.
    pub providers: ProviderRegistry,
}

impl AppState {
    /// Wire the job runner to `providers` using the limits in `config`.
    pub fn new(config: ServerConfig, providers: ProviderRegistry) -> Self {
        let runner = JobRunner::new(providers.clone(), config.worker_settings());
        Self {
            config: Arc::new(config),
            job_store: JobStore::new(),
            runner,
            providers,
        }
    }
}

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lingosheet_worker::WorkerSettings;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Does not bound an
    /// open progress stream, only the time to produce response headers.
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight jobs, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Root of the per-job upload directories.
    pub upload_dir: PathBuf,
    /// Where translated workbooks are written and served from.
    pub output_dir: PathBuf,
    /// Largest accepted request body for `POST /translate`, in bytes.
    pub max_upload_bytes: usize,
    /// Jobs translated at the same time.
    pub max_concurrent_jobs: usize,
    /// Pause after each translated cell.
    pub translation_pacing: Duration,
    /// Silence after which a progress stream emits a heartbeat.
    pub sse_heartbeat: Duration,
    /// How long finished jobs stay queryable.
    pub job_retention: Duration,
    /// How often finished jobs are swept.
    pub job_sweep_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `5000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `UPLOAD_DIR`              | `uploads`                  |
    /// | `OUTPUT_DIR`              | value of `UPLOAD_DIR`      |
    /// | `MAX_UPLOAD_MB`           | `50`                       |
    /// | `MAX_CONCURRENT_JOBS`     | `4`                        |
    /// | `TRANSLATION_PACING_MS`   | `100`                      |
    /// | `SSE_HEARTBEAT_SECS`      | `1`                        |
    /// | `JOB_RETENTION_SECS`      | `3600`                     |
    /// | `JOB_SWEEP_INTERVAL_SECS` | `60`                       |
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 5000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let upload_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));
        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| upload_dir.clone());

        let max_upload_mb: usize = env_or("MAX_UPLOAD_MB", 50);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            upload_dir,
            output_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            max_concurrent_jobs: env_or("MAX_CONCURRENT_JOBS", 4),
            translation_pacing: Duration::from_millis(env_or("TRANSLATION_PACING_MS", 100)),
            sse_heartbeat: Duration::from_secs(env_or("SSE_HEARTBEAT_SECS", 1)),
            job_retention: Duration::from_secs(env_or("JOB_RETENTION_SECS", 3600)),
            job_sweep_interval: Duration::from_secs(env_or("JOB_SWEEP_INTERVAL_SECS", 60)),
        }
    }

    /// Settings for the job runner.
    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            max_concurrent_jobs: self.max_concurrent_jobs,
            pacing: self.translation_pacing,
        }
    }
}

/// Parse env var `name`, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

//! Periodic eviction of finished translation jobs.
//!
//! A finished job stays queryable for the retention period so a client can
//! still fetch its terminal event; after that its id becomes unknown.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio_util::sync::CancellationToken;

use lingosheet_events::JobStore;

/// Evict jobs that finished more than `retention` ago. Returns how many.
pub async fn sweep(store: &JobStore, retention: Duration) -> usize {
    let retention = TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX);
    let cutoff = Utc::now()
        .checked_sub_signed(retention)
        .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
    store.evict_finished_before(cutoff).await
}

/// Run the retention loop until `cancel` is triggered.
pub async fn run(
    store: JobStore,
    retention: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_secs = retention.as_secs(),
        interval_secs = interval.as_secs(),
        "Job retention sweeper started"
    );

    // `interval` panics on a zero period.
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Job retention sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                let evicted = sweep(&store, retention).await;
                if evicted > 0 {
                    tracing::info!(evicted, "Job retention: evicted finished jobs");
                } else {
                    tracing::debug!("Job retention: nothing to evict");
                }
            }
        }
    }
}

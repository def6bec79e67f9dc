//! Job progress events and the in-memory job registry.
//!
//! - [`ProgressEvent`]: the discriminated progress message streamed to
//!   clients, with its JSON wire encoding.
//! - [`JobStore`]: process-wide registry mapping a job id to its status and
//!   its per-job `tokio::sync::broadcast` channel.
//! - [`ProgressSender`]: the single writing handle a worker uses to report
//!   progress; consumed by the terminal transitions.
//!
//! Eviction of finished jobs is driven from outside via
//! [`JobStore::evict_finished_before`].

pub mod event;
pub mod store;

pub use event::ProgressEvent;
pub use store::{
    JobSnapshot, JobStatus, JobStore, JobStoreError, ProgressSender, Subscription,
    CHANNEL_CAPACITY,
};

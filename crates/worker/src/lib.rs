//! Background execution of translation jobs.
//!
//! A [`TranslationJob`] describes one uploaded workbook. The [`JobRunner`]
//! owns every running job: it bounds concurrency, drives the translation
//! workflow and reports through the job's
//! [`ProgressSender`](lingosheet_events::ProgressSender).

pub mod error;
pub mod job;
pub mod runner;
pub mod workflow;

pub use error::WorkerError;
pub use job::TranslationJob;
pub use runner::{JobRunner, WorkerSettings};

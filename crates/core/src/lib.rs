//! Domain types and rules shared by every lingosheet crate.
//!
//! Nothing in here performs I/O: identifiers, error taxonomy, the static
//! provider/language catalogue, upload naming rules and progress arithmetic.

pub mod catalog;
pub mod error;
pub mod language;
pub mod progress;
pub mod types;
pub mod upload;

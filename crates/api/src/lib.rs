//! Lingosheet API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! progress stream adapter and background tasks) so integration tests and
//! the binary entrypoint share them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod sse;
pub mod state;

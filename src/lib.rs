//! Adam API server
//!
//! A small HTTP service answering status and liveness probes on `/` and
//! `/health`, with environment-driven startup and signal-driven shutdown.

pub mod config;
pub mod server;

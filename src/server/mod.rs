//! HTTP server and process lifecycle
//!
//! Serves the status endpoints:
//! - `/` - Service status
//! - `/health` - Liveness probe
//!
//! Also owns startup, SIGTERM/SIGINT handling and exit status.

mod health;
pub mod lifecycle;
pub mod shutdown;

pub use health::{build_router, AppState, HealthResponse, StatusResponse};
pub use lifecycle::{BoundServer, Lifecycle, LifecycleState, StartupError};
pub use shutdown::{shutdown_channel, ShutdownController, ShutdownSignal, Signals};

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;

//! Process lifecycle of the API server
//!
//! ```text
//! Init ──▶ Starting ──▶ Serving ──▶ Stopping ──▶ Stopped
//!             │            │
//!             └──▶ Failed ◀┘
//! ```
//!
//! Every transition logs a single line prefixed with a status glyph.
//! `Stopped` maps to exit code 0, `Failed` to exit code 1.

use crate::config::{ApiConfig, ConfigError, SERVICE_TITLE};
use crate::server::health::build_router;
use crate::server::shutdown::{
    shutdown_channel, spawn_signal_listener, ShutdownController, ShutdownSignal, Signals,
};
use std::fmt;
use std::future::IntoFuture;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Reasons the server could not come up (or stay up)
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to register signal handlers: {0}")]
    Signals(#[source] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

/// Where the process is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Init,
    Starting,
    Serving,
    Stopping,
    Stopped,
    Failed,
}

impl LifecycleState {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Init, Starting)
                | (Starting, Serving)
                | (Starting, Failed)
                | (Serving, Stopping)
                | (Serving, Failed)
                | (Stopping, Stopped)
        )
    }

    /// Glyph prefixed to the log line announcing this state
    ///
    /// `Init` is never entered by a transition, so it has none.
    pub fn indicator(self) -> Option<&'static str> {
        let glyph = match self {
            LifecycleState::Init => return None,
            LifecycleState::Starting => "🚀",
            LifecycleState::Serving => "🌐",
            LifecycleState::Stopping => "🛑",
            LifecycleState::Stopped => "👋",
            LifecycleState::Failed => "❌",
        };
        Some(glyph)
    }

    /// Process exit status for this state
    ///
    /// Anything other than a clean stop is a failure.
    pub fn exit_code(self) -> u8 {
        match self {
            LifecycleState::Stopped => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Init => "init",
            LifecycleState::Starting => "starting",
            LifecycleState::Serving => "serving",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A listener bound and ready to serve
pub struct BoundServer {
    listener: TcpListener,
    config: ApiConfig,
}

impl BoundServer {
    /// Bind the configured address
    pub async fn bind(config: ApiConfig) -> Result<Self, StartupError> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind { addr, source })?;
        Ok(Self { listener, config })
    }
}

/// Drives the server through its states
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Init,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Move to `next` and log `message` with its indicator
    ///
    /// Illegal transitions are logged and ignored.
    fn advance(&mut self, next: LifecycleState, message: &str) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "Ignoring illegal lifecycle transition");
            return false;
        }
        self.state = next;
        let glyph = next.indicator().unwrap_or_default();
        if next == LifecycleState::Failed {
            error!(state = %next, "{} {}", glyph, message);
        } else {
            info!(state = %next, "{} {}", glyph, message);
        }
        true
    }

    fn fail(&mut self, err: &StartupError) {
        self.advance(
            LifecycleState::Failed,
            &format!("Failed to start API server: {}", err),
        );
    }

    /// Run the server until SIGTERM/SIGINT
    pub async fn run(
        &mut self,
        config: Result<ApiConfig, ConfigError>,
    ) -> Result<(), StartupError> {
        let (controller, signal) = shutdown_channel();
        self.run_with_shutdown(config, controller, signal).await
    }

    /// Run the server until `signal` fires
    ///
    /// Termination signals are forwarded into `controller`, so callers
    /// holding a clone of it can also stop the server.
    pub async fn run_with_shutdown(
        &mut self,
        config: Result<ApiConfig, ConfigError>,
        controller: ShutdownController,
        signal: ShutdownSignal,
    ) -> Result<(), StartupError> {
        self.advance(
            LifecycleState::Starting,
            &format!("Starting API server mode ({})", SERVICE_TITLE),
        );

        let server = match Self::start(config, controller).await {
            Ok(server) => server,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        self.serve(server, signal).await
    }

    async fn start(
        config: Result<ApiConfig, ConfigError>,
        controller: ShutdownController,
    ) -> Result<BoundServer, StartupError> {
        let config = config?;
        let signals = Signals::install().map_err(StartupError::Signals)?;
        let server = BoundServer::bind(config).await?;
        spawn_signal_listener(signals, controller);
        Ok(server)
    }

    /// Serve requests on `server` until `shutdown` fires
    ///
    /// On shutdown the listener is dropped immediately: no new connections
    /// are accepted and in-flight requests are not waited for.
    async fn serve(
        &mut self,
        server: BoundServer,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), StartupError> {
        let BoundServer { listener, config } = server;
        let port = config.port;
        let app = build_router(config);

        self.advance(
            LifecycleState::Serving,
            &format!("API server started on port {}", port),
        );

        let outcome = tokio::select! {
            result = axum::serve(listener, app).into_future() => Some(result),
            _ = shutdown.wait() => None,
        };

        match outcome {
            None => {
                self.advance(LifecycleState::Stopping, "Shutting down API server...");
                self.advance(LifecycleState::Stopped, "API server stopped");
                Ok(())
            }
            Some(result) => {
                let source = match result {
                    Ok(()) => std::io::Error::other("listener closed"),
                    Err(e) => e,
                };
                let err = StartupError::Serve(source);
                self.advance(LifecycleState::Failed, &format!("API server failed: {}", err));
                Err(err)
            }
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

//! Termination signal handling for the API server
//!
//! SIGTERM and SIGINT (Ctrl+C elsewhere) request shutdown. The request is
//! latched: only the first signal has an effect, later ones are ignored.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Receiving side of the shutdown latch
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for shutdown signal
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                // Sender dropped, treat as shutdown
                break;
            }
        }
    }
}

/// Sending side of the shutdown latch
#[derive(Clone)]
pub struct ShutdownController {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownController {
    /// Trigger shutdown
    ///
    /// Returns `true` only for the call that actually flipped the latch.
    pub fn shutdown(&self) -> bool {
        let first = self.sender.send_if_modified(|requested| {
            if *requested {
                false
            } else {
                *requested = true;
                true
            }
        });
        if first {
            debug!("Shutdown signal sent");
        }
        first
    }

    /// Check if shutdown was already requested (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Create a new shutdown signal pair
///
/// Returns (controller, signal) where:
/// - controller: Used to trigger shutdown
/// - signal: Cloned and passed to components that need to listen
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        ShutdownController {
            sender: Arc::new(sender),
        },
        ShutdownSignal { receiver },
    )
}

/// Registered termination signal handlers
///
/// Registration happens up front so a failure surfaces as a startup error
/// instead of a panic while serving.
pub struct Signals {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
}

impl Signals {
    /// Register handlers for SIGTERM and SIGINT
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Ctrl+C is registered lazily on non-unix targets
    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next SIGTERM or SIGINT
    ///
    /// Returns the signal name that was received.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }

    /// Wait for Ctrl+C
    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to wait for Ctrl+C");
            std::future::pending::<()>().await;
        }
        "CTRL_C"
    }
}

/// Forward termination signals into the shutdown latch
///
/// Runs until the runtime stops. Signals after the first are logged and
/// otherwise ignored.
pub fn spawn_signal_listener(
    mut signals: Signals,
    controller: ShutdownController,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let signal = signals.recv().await;
            if controller.is_shutdown() {
                debug!(signal = signal, "Shutdown already in progress, ignoring signal");
                continue;
            }
            info!(signal = signal, "Received termination signal");
            controller.shutdown();
        }
    })
}

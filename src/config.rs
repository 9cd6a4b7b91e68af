//! Startup configuration read from the process environment
//!
//! The only tunable is the listening port (`API_PORT`, default 8880).
//! Values are read once at startup and never change afterwards.

use std::env::VarError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable holding the TCP port to bind
pub const PORT_ENV: &str = "API_PORT";

/// Port used when `API_PORT` is unset
pub const DEFAULT_PORT: u16 = 8880;

/// Display name of the service, logged at startup
pub const SERVICE_TITLE: &str = "Adam API Server";

/// The server always listens on every interface
const BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Errors that can occur while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API_PORT must be a port number between 1 and 65535, got {value:?}")]
    InvalidPort { value: String },
}

/// Server configuration, built once and handed to the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ApiConfig {
    /// Configuration listening on `port` on all interfaces
    pub fn new(port: u16) -> Self {
        Self {
            host: BIND_HOST,
            port,
        }
    }

    /// Read configuration from the process environment
    ///
    /// A value that is not valid unicode is treated as an invalid port
    /// rather than as absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_ENV) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };
        Ok(Self::new(port))
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

/// Parse a port number, tolerating surrounding whitespace
///
/// Zero is rejected: it would ask the OS for an ephemeral port, which
/// nobody could then find.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort {
            value: raw.to_string(),
        }),
    }
}

/// Load variables from a `.env` file in the working directory, if any
///
/// Variables already present in the environment win over the file.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded environment from file"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!(error = %e, "Failed to load .env file"),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use adam_api::config::{load_dotenv, ApiConfig};
use adam_api::server::Lifecycle;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();

    let mut lifecycle = Lifecycle::new();
    if let Err(e) = lifecycle.run(ApiConfig::from_env()).await {
        // Already reported by the lifecycle as a failure line
        debug!(error = ?e, "API server exiting with failure");
    }

    ExitCode::from(lifecycle.state().exit_code())
}

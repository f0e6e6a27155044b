//! Video Search Main Entry Point
//!
//! Mirrors the content store's videos into OpenSearch on a fixed schedule and
//! serves name search over HTTP.

use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use video_search::server::run_server;
use video_search::{Config, Dependencies, IndexingError};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("video_search=info,video_search_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "video-search",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "video-search",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Received Ctrl-C, shutting down");
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting Video Search");

    let config = Config::from_env()?;

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let orchestrator = deps.orchestrator.clone();
    let scheduler = tokio::spawn(async move { orchestrator.run().await });

    let result = run_server(deps.router, deps.listen_addr, shutdown_signal()).await;

    // The server has stopped; let the in-flight sync cycle finish.
    deps.orchestrator.shutdown();
    if let Err(e) = scheduler.await {
        error!(error = %e, "Sync scheduler task panicked");
    }

    match result {
        Ok(()) => {
            info!("Video search stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Video search failed");
            Err(e)
        }
    }
}

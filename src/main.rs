//! Pulse - Entry Point
//!
//! Loads configuration, launches the heartbeat worker pool and drives
//! graceful shutdown on Ctrl+C or SIGTERM.

use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod heartbeat;
mod proxy;

use config::{Config, LogConfig};
use heartbeat::WorkerPool;

#[tokio::main]
async fn main() -> error::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log);

    info!("Starting Pulse heartbeat pool");
    info!("Heartbeat endpoint: {}", config.worker.endpoint);

    // Load proxy entries
    let entries = config::load_proxy_list(&config.proxy_file)?;
    info!(
        "Loaded {} proxy entries from {}",
        entries.len(),
        config.proxy_file
    );

    // Launch one worker per valid entry
    let credentials = Arc::new(config.credentials.clone());
    let pool = WorkerPool::start(&entries, credentials, config.worker.clone())?;

    // Wait for shutdown signal
    shutdown_signal().await;
    info!("Shutdown signal received");

    // Stop all workers and wait for clean exit
    pool.stop().await;

    info!("Pulse stopped");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pulse={}", log.level).into());

    if log.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

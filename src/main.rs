use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber;

use subnetgate::config::SubnetgateConfig;
use subnetgate::http::HttpServer;
use subnetgate::ratelimit::RateLimiter;

#[derive(Parser, Debug)]
#[command(name = "subnetgate")]
#[command(about = "Per-subnet HTTP request rate limiter")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("Starting Subnetgate Rate Limiting Service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Load configuration, with environment overrides on top
    let config = match args.config.as_deref() {
        Some(path) => SubnetgateConfig::from_file(path)?,
        None => SubnetgateConfig::default(),
    }
    .with_env_overrides()?;

    let limiter_config = config.limiter_config()?;
    info!(
        http_addr = %config.server.http_addr,
        prefix_size_bits = limiter_config.prefix_size_bits,
        limit = limiter_config.limit,
        cooldown_ms = limiter_config.cooldown.as_millis() as u64,
        "Configuration loaded"
    );

    // Initialize the rate limiter
    let limiter = Arc::new(RateLimiter::new(limiter_config));
    info!("Rate limiter initialized");

    // Create and start the HTTP server
    let server = HttpServer::new(config.server.http_addr, limiter);

    // Run the server with graceful shutdown on Ctrl+C
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Subnetgate Rate Limiting Service stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

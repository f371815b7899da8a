//! Calira backend server binary.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calira_server::config::{load_config, loader::config_from_env, AppConfig};
use calira_server::observability::metrics;
use calira_server::HttpServer;

#[derive(Parser)]
#[command(name = "calira-server")]
#[command(about = "Backend for the Calira task manager", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults plus environment overrides
    /// are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: AppConfig = match &cli.config {
        Some(path) => load_config(path)?,
        None => config_from_env()?,
    };

    // Initialize tracing subscriber; RUST_LOG wins over the config level.
    let default_filter = format!("calira_server={},tower_http=warn", config.observability.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("calira-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.security.environment,
        rate_limit_enabled = config.security.rate_limit.enabled,
        snapshot = ?config.storage.snapshot_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

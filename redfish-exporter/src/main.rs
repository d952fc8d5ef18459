//! Redfish Exporter - Prometheus metrics for BMC chassis health
//!
//! Startup order:
//! 1. `.env` + config file + `REDFISH_EXPORTER_*` overrides
//! 2. logging (`RUST_LOG` wins over `logLevel`)
//! 3. Redfish connection (session login unless basic auth)
//! 4. HTTP server until SIGINT / SIGTERM, then session logout

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use redfish_exporter::collectors::{Catalog, ChassisCollector, CollectorOptions};
use redfish_exporter::config::{Config, ConfigSource};
use redfish_exporter::exposition::MetricsExporter;
use redfish_exporter::http::{build_router, AppState};
use redfish_exporter::redfish::RedfishClient;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "redfish-exporter", version = VERSION, about = "Prometheus exporter for Redfish BMCs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the exporter HTTP server
    Serve {
        /// Path to the YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the exporter version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Version => {
            println!("Redfish Exporter version: {VERSION}");
            Ok(())
        }
        Command::Serve { config } => serve(config).await,
    }
}

async fn serve(config_flag: Option<PathBuf>) -> Result<()> {
    dotenvy::dotenv().ok();

    let path = Config::resolve_path(config_flag.as_deref());
    let (config, source) = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    init_tracing(&config.log_level);
    if source == ConfigSource::Defaults {
        warn!(path = %path.display(), "config file not found, using defaults and environment");
    }
    info!(version = VERSION, config = %path.display(), "Redfish exporter starting");

    let client = Arc::new(
        RedfishClient::connect(&config.host)
            .await
            .with_context(|| format!("Failed to connect to {}", config.host.endpoint))?,
    );

    let collector = ChassisCollector::new(
        client.clone(),
        Arc::new(Catalog::new()),
        CollectorOptions::from(&config),
    );
    info!(collectors = ?collector.collector_names(), "Chassis collectors enabled");

    let exporter = Arc::new(MetricsExporter::new(Arc::new(collector)));
    let app = build_router(AppState { exporter });

    let address = config.web.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutting down");
    client.logout().await;
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

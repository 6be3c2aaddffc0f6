//! Floodwatch Service - HTTP API
//!
//! Serves flood, weather, rainfall, shelter and hazard-alert data for a
//! location, backed by the Open-Meteo forecast and flood APIs.
//!
//! Usage:
//!   cargo run --release                         # Listen on 0.0.0.0:5000
//!   cargo run --release -- --port 8080          # Override the port
//!   cargo run --release -- --config prod.toml   # Alternate config file
//!
//! Environment:
//!   FLOODWATCH_* - configuration overrides (see floodwatch.toml)
//!   RUST_LOG     - log filter, overrides [logging] filter

use clap::Parser;
use floodwatch_service::config::{DEFAULT_CONFIG_PATH, ServiceConfig};
use floodwatch_service::endpoint::{self, ApiHandler};
use floodwatch_service::ingest::OpenMeteoClient;
use floodwatch_service::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "floodwatch_service", version, about = "Flood, weather and hazard alert API")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Port to listen on (overrides config and FLOODWATCH_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides config and FLOODWATCH_BIND)
    #[arg(short, long)]
    bind: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match ServiceConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    init_logging(&config.logging.filter);

    tracing::info!("🌊 Floodwatch Service v{}", env!("CARGO_PKG_VERSION"));
    match &config.loaded_from {
        Some(path) => tracing::info!(path = %path, "loaded configuration"),
        None => tracing::warn!(
            path = %cli.config.display(),
            "config file not found, using built-in defaults"
        ),
    }
    tracing::info!(
        forecast = %config.upstream.forecast_base_url,
        flood = %config.upstream.flood_base_url,
        timeout_secs = config.upstream.timeout_secs,
        "upstream configuration"
    );

    let client = match OpenMeteoClient::new(&config.upstream) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build upstream HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let handler = ApiHandler::new(client, &config);

    if let Err(e) = endpoint::start_endpoint_server(&config.server, handler) {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

//! Service configuration loader - parses floodwatch.toml
//!
//! Keeps listen address, upstream endpoints and default coordinates out of
//! the code so a deployment can point at a different Open-Meteo mirror or
//! region without recompiling.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file,
//! environment variables (a `.env` file is honoured), CLI flags.

use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::model::Coordinates;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "floodwatch.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {var}: {value:?}")]
    InvalidOverride { var: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Configuration sections
// ---------------------------------------------------------------------------

/// Root configuration structure for TOML parsing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub defaults: DefaultLocations,
    pub logging: LoggingConfig,
    /// File the configuration was read from; `None` when built-in defaults
    /// were used because no file existed.
    #[serde(skip)]
    pub loaded_from: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Size of the request worker pool.
    pub workers: usize,
    /// Value of `Access-Control-Allow-Origin` on `/api/*` responses.
    pub cors_allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            workers: 4,
            cors_allow_origin: "*".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Open-Meteo endpoints and client settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub forecast_base_url: String,
    pub flood_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            flood_base_url: "https://flood-api.open-meteo.com/v1/flood".to_string(),
            timeout_secs: 10,
            user_agent: concat!("floodwatch_service/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Coordinates used when a request omits `lat`/`lon`.
///
/// `/api/floods` has its own default (Mahanadi delta, Odisha); every other
/// endpoint defaults to Delhi.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultLocations {
    pub flood_lat: f64,
    pub flood_lon: f64,
    pub lat: f64,
    pub lon: f64,
}

impl Default for DefaultLocations {
    fn default() -> Self {
        Self {
            flood_lat: 20.1717029,
            flood_lon: 85.7134411,
            lat: 28.7041,
            lon: 77.1025,
        }
    }
}

impl DefaultLocations {
    pub fn flood(&self) -> Coordinates {
        Coordinates::new(self.flood_lat, self.flood_lon)
    }

    pub fn general(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins if set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "floodwatch_service=info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ServiceConfig {
    /// Loads configuration from `path` (if it exists) and applies
    /// environment overrides.
    ///
    /// A missing file is not an error; the built-in defaults are used.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = Self::from_file(path)?;
        config.apply_overrides(|var| env::var(var).ok())?;
        Ok(config)
    }

    /// Reads and parses the TOML file without consulting the environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %shown, "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path: shown, source }),
        };

        let mut config = Self::from_toml_str(&contents, &shown)?;
        config.loaded_from = Some(shown);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Applies `FLOODWATCH_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FLOODWATCH_BIND") {
            self.server.bind_address = v;
        }
        if let Some(v) = lookup("FLOODWATCH_PORT") {
            self.server.port = parse_override("FLOODWATCH_PORT", v)?;
        }
        if let Some(v) = lookup("FLOODWATCH_WORKERS") {
            self.server.workers = parse_override("FLOODWATCH_WORKERS", v)?;
        }
        if let Some(v) = lookup("FLOODWATCH_FORECAST_URL") {
            self.upstream.forecast_base_url = v;
        }
        if let Some(v) = lookup("FLOODWATCH_FLOOD_URL") {
            self.upstream.flood_base_url = v;
        }
        if let Some(v) = lookup("FLOODWATCH_UPSTREAM_TIMEOUT_SECS") {
            self.upstream.timeout_secs = parse_override("FLOODWATCH_UPSTREAM_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("FLOODWATCH_LOG") {
            self.logging.filter = v;
        }

        // A pool of zero threads would never serve a request.
        self.server.workers = self.server.workers.max(1);
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(
    var: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|_| ConfigError::InvalidOverride { var, value })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Upstream data sources.
//!
//! - `open_meteo` — Open-Meteo forecast and flood API client
//! - `fixtures` (test only) — representative API response payloads
//!
//! The HTTP endpoint talks to upstreams only through `ForecastProvider`, so
//! handlers can be exercised against in-process stubs.

pub mod open_meteo;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::model::Coordinates;
use thiserror::Error;

pub use open_meteo::{CurrentConditions, FloodForecast, HourlySeries, OpenMeteoClient};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or decoding upstream data.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS, timeout or body-read failure.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-2xx HTTP response.
    #[error("HTTP error: {0}")]
    Status(u16),
    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl UpstreamError {
    /// HTTP status code, if the upstream answered with a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// Hourly variables the service requests from the forecast API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourlyVariable {
    Precipitation,
    Temperature,
}

impl HourlyVariable {
    /// Query parameter value understood by the forecast API.
    pub fn as_param(&self) -> &'static str {
        match self {
            HourlyVariable::Precipitation => "precipitation",
            HourlyVariable::Temperature => "temperature_2m",
        }
    }
}

/// Source of forecast and flood data for a location.
///
/// Each method performs at most one upstream call.
pub trait ForecastProvider: Send + Sync {
    fn current_conditions(&self, at: Coordinates) -> Result<CurrentConditions, UpstreamError>;

    fn hourly(
        &self,
        at: Coordinates,
        variable: HourlyVariable,
    ) -> Result<HourlySeries, UpstreamError>;

    fn flood_forecast(&self, at: Coordinates) -> Result<FloodForecast, UpstreamError>;
}

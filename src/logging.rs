//! Structured logging for the floodwatch service.
//!
//! Sets up the `tracing` subscriber and provides context-rich logging of
//! upstream failures (data source, coordinates, operation) with automatic
//! severity classification.

use crate::ingest::UpstreamError;
use crate::model::Coordinates;
use std::fmt;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Subscriber setup
// ---------------------------------------------------------------------------

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Open-Meteo forecast API (current and hourly weather).
    Forecast,
    /// Open-Meteo flood API (river discharge).
    Flood,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Forecast => write!(f, "forecast"),
            DataSource::Flood => write!(f, "flood"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the upstream rejected the request (bad coordinates,
    /// location outside model coverage).
    Expected,
    /// Unexpected failure - indicates upstream outage or an API change.
    Unexpected,
    /// Unknown - cannot determine if this is expected or not.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classifies an upstream failure by its error kind.
pub fn classify_failure(err: &UpstreamError) -> FailureType {
    match err {
        UpstreamError::Status(code) if (400..500).contains(code) => FailureType::Expected,
        UpstreamError::Status(_) => FailureType::Unexpected,
        // Parse errors suggest API changes
        UpstreamError::Parse(_) => FailureType::Unexpected,
        UpstreamError::Request(e) if e.is_timeout() || e.is_connect() => FailureType::Unexpected,
        UpstreamError::Request(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Logs an upstream failure at a level matching its classification.
pub fn log_upstream_failure(
    source: DataSource,
    at: Coordinates,
    operation: &str,
    err: &UpstreamError,
) {
    let failure = classify_failure(err);

    match failure {
        FailureType::Expected => tracing::debug!(
            source = %source, lat = at.lat, lon = at.lon, failure = %failure,
            "{} failed: {}", operation, err
        ),
        FailureType::Unexpected => tracing::error!(
            source = %source, lat = at.lat, lon = at.lon, failure = %failure,
            "{} failed: {}", operation, err
        ),
        FailureType::Unknown => tracing::warn!(
            source = %source, lat = at.lat, lon = at.lon, failure = %failure,
            "{} failed: {}", operation, err
        ),
    }
}

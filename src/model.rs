//! Core data types for the floodwatch service.
//!
//! Classifier inputs (`WeatherSignal`, `FloodSignal`), its output (`Alert`),
//! and the reshaped JSON payloads returned by the HTTP endpoint. Upstream
//! wire formats live in `ingest::open_meteo`; this module only holds the
//! shapes the rest of the service agrees on.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Number;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns these coordinates shifted by the same offset on both axes.
    pub fn offset(&self, delta: f64) -> Self {
        Self {
            lat: self.lat + delta,
            lon: self.lon + delta,
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier signals
// ---------------------------------------------------------------------------

/// Current-weather signals consumed by the hazard classifier.
///
/// Every field is already normalized: anything the upstream omitted is `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherSignal {
    pub wind_speed_kmh: f64,
    pub precipitation_mm: f64,
    /// WMO weather interpretation code (e.g. 95 = thunderstorm).
    pub weather_code: i64,
}

/// River-discharge signal consumed by the hazard classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloodSignal {
    /// Today's forecast discharge (first value of the daily sequence).
    pub river_discharge: f64,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Hazard category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Cyclone,
    Rainfall,
    Flood,
    Safe,
}

/// A single human-readable alert, serialized as
/// `{"message": ..., "type": ..., "timestamp": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        alert_type: AlertType,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message: message.into(),
            alert_type,
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint payloads
// ---------------------------------------------------------------------------

/// Serializes a missing measurement as `"N/A"` instead of `null`.
fn value_or_na<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str("N/A"),
    }
}

/// Current conditions at a location, as returned by `/api/weather`.
///
/// Readings are echoed in the upstream's own number form, so `88` stays an
/// integer and `27.4` a float.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub lat: f64,
    pub lon: f64,
    #[serde(serialize_with = "value_or_na")]
    pub temperature: Option<Number>,
    #[serde(serialize_with = "value_or_na")]
    pub humidity: Option<Number>,
    #[serde(serialize_with = "value_or_na")]
    pub precipitation: Option<Number>,
    #[serde(serialize_with = "value_or_na")]
    pub wind_speed: Option<Number>,
    #[serde(serialize_with = "value_or_na")]
    pub weather_code: Option<Number>,
}

/// Flood summary returned by `/api/floods`.
///
/// Fields are passed through untouched because the upstream does not commit
/// to a type for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodSummary {
    pub latitude: f64,
    pub longitude: f64,
    pub flood_risk: serde_json::Value,
    pub water_level: serde_json::Value,
    pub risk_description: serde_json::Value,
}

/// Next few hours of precipitation, returned by `/api/rainfall`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallReport {
    pub lat: f64,
    pub lon: f64,
    pub rainfall: Vec<Option<f64>>,
}

/// One hour of the `/api/hourly-weather` forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTemperature {
    /// 12-hour clock label, e.g. `"07 PM"`.
    pub time: String,
    pub temp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub lat: f64,
    pub lon: f64,
    pub forecast: Vec<HourlyTemperature>,
}

/// An emergency shelter location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shelter {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Severity label of a flood zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSeverity {
    Moderate,
    Severe,
}

/// A circular flood-affected area, returned by `/api/flood-zones`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodZone {
    pub id: u32,
    pub severity: ZoneSeverity,
    /// `[lat, lon]`
    pub center: [f64; 2],
    /// Radius in metres.
    pub radius: u32,
    /// Water level in metres.
    #[serde(rename = "waterLevel")]
    pub water_level: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Open-Meteo API client.
//!
//! Handles URL construction and JSON response parsing for two services:
//!   https://api.open-meteo.com/v1/forecast      (current + hourly weather)
//!   https://flood-api.open-meteo.com/v1/flood   (daily river discharge)
//!
//! See `fixtures.rs` for annotated examples of both response shapes.

use super::{ForecastProvider, HourlyVariable, UpstreamError};
use crate::config::UpstreamConfig;
use crate::model::{Coordinates, FloodSignal, WeatherSignal};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::time::Duration;

/// Variables requested in the `current` block of a forecast call.
const CURRENT_VARIABLES: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code";

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    current: CurrentConditions,
    #[serde(default, deserialize_with = "null_as_default")]
    hourly: HourlySeries,
}

/// The `current` block of a forecast response.
///
/// Values are kept exactly as the upstream sent them so `/api/weather` can
/// echo them. A variable that is absent, `null` or not a number is `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentConditions {
    #[serde(default, deserialize_with = "numeric")]
    pub temperature_2m: Option<Number>,
    #[serde(default, deserialize_with = "numeric")]
    pub relative_humidity_2m: Option<Number>,
    #[serde(default, deserialize_with = "numeric")]
    pub precipitation: Option<Number>,
    #[serde(default, deserialize_with = "numeric")]
    pub wind_speed_10m: Option<Number>,
    #[serde(default, deserialize_with = "numeric")]
    pub weather_code: Option<Number>,
}

impl CurrentConditions {
    /// Normalizes into classifier input, substituting `0` for anything missing.
    pub fn to_signal(&self) -> WeatherSignal {
        WeatherSignal {
            wind_speed_kmh: reading_or_zero(&self.wind_speed_10m),
            precipitation_mm: reading_or_zero(&self.precipitation),
            weather_code: self.weather_code.as_ref().and_then(whole_number).unwrap_or(0),
        }
    }
}

fn reading_or_zero(value: &Option<Number>) -> f64 {
    value.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
}

/// WMO codes are integers, but `95.0` is accepted as `95`.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64()
        .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
}

/// Accepts any JSON value, keeping only numbers.
fn numeric<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(Some(n)),
        _ => Ok(None),
    }
}

/// Treats an explicit `null` block the same as a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `hourly` block of a forecast response. Only the requested variable
/// is populated; the others stay empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlySeries {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precipitation: Vec<Option<f64>>,
}

/// Flood API response.
///
/// `flood_risk`, `water_level` and `risk_description` are not part of the
/// documented payload but are passed through if a deployment adds them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FloodForecast {
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily: DailyDischarge,
    pub flood_risk: Option<serde_json::Value>,
    pub water_level: Option<serde_json::Value>,
    pub risk_description: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyDischarge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub river_discharge: Vec<Option<f64>>,
}

impl FloodForecast {
    /// Today's discharge (first value), or `0` when the sequence is empty
    /// or starts with `null`.
    pub fn to_signal(&self) -> FloodSignal {
        FloodSignal {
            river_discharge: self
                .daily
                .river_discharge
                .first()
                .copied()
                .flatten()
                .unwrap_or(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a forecast URL requesting the current-conditions block.
pub fn build_current_url(base_url: &str, at: Coordinates) -> String {
    format!(
        "{}?latitude={}&longitude={}&current={}",
        base_url, at.lat, at.lon, CURRENT_VARIABLES
    )
}

/// Builds a forecast URL requesting a single hourly variable.
pub fn build_hourly_url(base_url: &str, at: Coordinates, variable: HourlyVariable) -> String {
    format!(
        "{}?latitude={}&longitude={}&hourly={}",
        base_url,
        at.lat,
        at.lon,
        variable.as_param()
    )
}

/// Builds a flood API URL requesting daily river discharge.
pub fn build_flood_url(base_url: &str, at: Coordinates) -> String {
    format!(
        "{}?latitude={}&longitude={}&daily=river_discharge",
        base_url, at.lat, at.lon
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body)
        .map_err(|e| UpstreamError::Parse(format!("JSON deserialization failed: {}", e)))
}

/// Parses the `current` block out of a forecast response body.
pub fn parse_current_response(body: &str) -> Result<CurrentConditions, UpstreamError> {
    parse_json::<ForecastResponse>(body).map(|r| r.current)
}

/// Parses the `hourly` block out of a forecast response body.
pub fn parse_hourly_response(body: &str) -> Result<HourlySeries, UpstreamError> {
    parse_json::<ForecastResponse>(body).map(|r| r.hourly)
}

/// Parses a flood API response body.
pub fn parse_flood_response(body: &str) -> Result<FloodForecast, UpstreamError> {
    parse_json(body)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking Open-Meteo client. Cheap to share across worker threads.
pub struct OpenMeteoClient {
    http: reqwest::blocking::Client,
    forecast_base_url: String,
    flood_base_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            forecast_base_url: config.forecast_base_url.clone(),
            flood_base_url: config.flood_base_url.clone(),
        })
    }

    fn fetch(&self, url: &str) -> Result<String, UpstreamError> {
        tracing::debug!(url, "fetching upstream");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        Ok(response.text()?)
    }
}

impl ForecastProvider for OpenMeteoClient {
    fn current_conditions(&self, at: Coordinates) -> Result<CurrentConditions, UpstreamError> {
        let body = self.fetch(&build_current_url(&self.forecast_base_url, at))?;
        parse_current_response(&body)
    }

    fn hourly(
        &self,
        at: Coordinates,
        variable: HourlyVariable,
    ) -> Result<HourlySeries, UpstreamError> {
        let body = self.fetch(&build_hourly_url(&self.forecast_base_url, at, variable))?;
        parse_hourly_response(&body)
    }

    fn flood_forecast(&self, at: Coordinates) -> Result<FloodForecast, UpstreamError> {
        let body = self.fetch(&build_flood_url(&self.flood_base_url, at))?;
        parse_flood_response(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::model::AlertType;

    const FORECAST: &str = "https://api.open-meteo.com/v1/forecast";
    const FLOOD: &str = "https://flood-api.open-meteo.com/v1/flood";

    fn delhi() -> Coordinates {
        Coordinates::new(28.7041, 77.1025)
    }

    #[test]
    fn test_current_url_requests_all_variables() {
        let url = build_current_url(FORECAST, delhi());
        assert_eq!(
            url,
            "https://api.open-meteo.com/v1/forecast?latitude=28.7041&longitude=77.1025\
             &current=temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code"
        );
    }

    #[test]
    fn test_hourly_url_uses_variable_param() {
        let url = build_hourly_url(FORECAST, delhi(), HourlyVariable::Temperature);
        assert!(url.ends_with("&hourly=temperature_2m"));

        let url = build_hourly_url(FORECAST, delhi(), HourlyVariable::Precipitation);
        assert!(url.ends_with("&hourly=precipitation"));
    }

    #[test]
    fn test_flood_url() {
        let url = build_flood_url(FLOOD, Coordinates::new(20.1717029, 85.7134411));
        assert_eq!(
            url,
            concat!(
                "https://flood-api.open-meteo.com/v1/flood",
                "?latitude=20.1717029&longitude=85.7134411&daily=river_discharge"
            )
        );
    }

    #[test]
    fn test_parse_current_thunderstorm() {
        let current = parse_current_response(fixture_current_thunderstorm_json()).unwrap();
        assert_eq!(current.temperature_2m, Number::from_f64(27.4));
        assert_eq!(current.relative_humidity_2m, Some(Number::from(88)));
        assert_eq!(current.weather_code, Some(Number::from(95)));

        let signal = current.to_signal();
        assert_eq!(signal.wind_speed_kmh, 62.3);
        assert_eq!(signal.precipitation_mm, 14.2);
        assert_eq!(signal.weather_code, 95);
    }

    #[test]
    fn test_parse_current_with_missing_fields_defaults_signal() {
        let current = parse_current_response(fixture_current_partial_json()).unwrap();
        assert_eq!(current.wind_speed_10m, None);
        assert_eq!(current.weather_code, None);

        let signal = current.to_signal();
        assert_eq!(signal, WeatherSignal { precipitation_mm: 0.4, ..Default::default() });
    }

    #[test]
    fn test_parse_response_without_current_block() {
        let current = parse_current_response(r#"{"latitude": 28.7, "longitude": 77.1}"#).unwrap();
        assert_eq!(current, CurrentConditions::default());
    }

    #[test]
    fn test_float_weather_code_still_signals_storm() {
        let body = r#"{"current": {"wind_speed_10m": 72.0, "weather_code": 95.0}}"#;
        let current = parse_current_response(body).unwrap();

        let signal = current.to_signal();
        assert_eq!(signal.weather_code, 95);
        assert_eq!(signal.wind_speed_kmh, 72.0);
        assert_eq!(
            crate::alert::classify(&signal, &FloodSignal::default())[0].alert_type,
            AlertType::Cyclone
        );
    }

    #[test]
    fn test_bad_field_defaults_only_that_field() {
        let body = r#"{"current": {
            "wind_speed_10m": 72.0,
            "precipitation": "heavy",
            "weather_code": 95.5
        }}"#;
        let signal = parse_current_response(body).unwrap().to_signal();

        assert_eq!(signal.wind_speed_kmh, 72.0);
        assert_eq!(signal.precipitation_mm, 0.0);
        assert_eq!(signal.weather_code, 0);
    }

    #[test]
    fn test_null_blocks_parse_as_empty() {
        let current = parse_current_response(r#"{"current": null}"#).unwrap();
        assert_eq!(current, CurrentConditions::default());

        let hourly = parse_hourly_response(r#"{"hourly": null}"#).unwrap();
        assert!(hourly.time.is_empty());

        let flood = parse_flood_response(r#"{"daily": null}"#).unwrap();
        assert_eq!(flood.to_signal().river_discharge, 0.0);

        let flood = parse_flood_response(r#"{"daily": {"river_discharge": null}}"#).unwrap();
        assert_eq!(flood.to_signal().river_discharge, 0.0);
    }

    #[test]
    fn test_parse_hourly_precipitation() {
        let hourly = parse_hourly_response(fixture_hourly_precipitation_json()).unwrap();
        assert_eq!(hourly.time.len(), 6);
        assert_eq!(hourly.precipitation[0], Some(0.0));
        assert_eq!(hourly.precipitation[2], None);
        assert!(hourly.temperature_2m.is_empty());
    }

    #[test]
    fn test_parse_hourly_temperature() {
        let hourly = parse_hourly_response(fixture_hourly_temperature_json()).unwrap();
        assert_eq!(hourly.time[0], "2024-05-01T00:00");
        assert_eq!(hourly.temperature_2m.len(), hourly.time.len());
    }

    #[test]
    fn test_parse_flood_takes_first_discharge() {
        let flood = parse_flood_response(fixture_flood_high_discharge_json()).unwrap();
        assert_eq!(flood.daily.river_discharge.len(), 3);
        assert_eq!(flood.to_signal().river_discharge, 152.6);
        assert_eq!(flood.flood_risk, None);
    }

    #[test]
    fn test_flood_signal_defaults_when_empty_or_null() {
        let empty =
            parse_flood_response(r#"{"daily": {"time": [], "river_discharge": []}}"#).unwrap();
        assert_eq!(empty.to_signal().river_discharge, 0.0);

        let null_first = parse_flood_response(fixture_flood_null_discharge_json()).unwrap();
        assert_eq!(null_first.to_signal().river_discharge, 0.0);

        let no_daily = parse_flood_response("{}").unwrap();
        assert_eq!(no_daily.to_signal().river_discharge, 0.0);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_flood_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, UpstreamError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_status_error_exposes_code() {
        let err = UpstreamError::Status(503);
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.to_string(), "HTTP error: 503");
        assert_eq!(UpstreamError::Parse("x".into()).status_code(), None);
    }
}

//! Test fixtures: representative JSON payloads from the Open-Meteo APIs.
//!
//! Structurally complete but truncated to the minimum needed to exercise
//! the parsers.
//!
//! Forecast response shape:
//!   latitude, longitude, timezone, ...
//!   current_units { <variable>: unit }
//!   current { time, interval, <variable>: number }
//!   hourly_units { <variable>: unit }
//!   hourly { time[], <variable>[] }   — values may be null
//!
//! Flood response shape:
//!   daily_units { river_discharge: "m³/s" }
//!   daily { time[], river_discharge[] }   — index 0 is today

/// Thunderstorm over Delhi: code 95, wind above the storm threshold,
/// precipitation above the heavy-rain threshold.
pub(crate) fn fixture_current_thunderstorm_json() -> &'static str {
    r#"{
      "latitude": 28.75,
      "longitude": 77.125,
      "generationtime_ms": 0.05,
      "utc_offset_seconds": 0,
      "timezone": "GMT",
      "timezone_abbreviation": "GMT",
      "elevation": 215.0,
      "current_units": {
        "time": "iso8601",
        "interval": "seconds",
        "temperature_2m": "°C",
        "relative_humidity_2m": "%",
        "precipitation": "mm",
        "wind_speed_10m": "km/h",
        "weather_code": "wmo code"
      },
      "current": {
        "time": "2024-05-01T12:00",
        "interval": 900,
        "temperature_2m": 27.4,
        "relative_humidity_2m": 88,
        "precipitation": 14.2,
        "wind_speed_10m": 62.3,
        "weather_code": 95
      }
    }"#
}

/// Current block where the station reported only temperature and
/// precipitation.
pub(crate) fn fixture_current_partial_json() -> &'static str {
    r#"{
      "latitude": 28.75,
      "longitude": 77.125,
      "current": {
        "time": "2024-05-01T12:00",
        "interval": 900,
        "temperature_2m": 35.1,
        "precipitation": 0.4
      }
    }"#
}

/// Six hours of precipitation with a gap at index 2.
pub(crate) fn fixture_hourly_precipitation_json() -> &'static str {
    r#"{
      "latitude": 28.75,
      "longitude": 77.125,
      "hourly_units": { "time": "iso8601", "precipitation": "mm" },
      "hourly": {
        "time": [
          "2024-05-01T00:00", "2024-05-01T01:00", "2024-05-01T02:00",
          "2024-05-01T03:00", "2024-05-01T04:00", "2024-05-01T05:00"
        ],
        "precipitation": [0.0, 0.3, null, 1.2, 4.8, 0.1]
      }
    }"#
}

/// Ten hours of temperature starting at midnight.
pub(crate) fn fixture_hourly_temperature_json() -> &'static str {
    r#"{
      "latitude": 28.75,
      "longitude": 77.125,
      "hourly_units": { "time": "iso8601", "temperature_2m": "°C" },
      "hourly": {
        "time": [
          "2024-05-01T00:00", "2024-05-01T01:00", "2024-05-01T02:00",
          "2024-05-01T03:00", "2024-05-01T04:00", "2024-05-01T05:00",
          "2024-05-01T06:00", "2024-05-01T07:00", "2024-05-01T08:00",
          "2024-05-01T09:00"
        ],
        "temperature_2m": [29.1, 28.6, 28.0, 27.7, 27.5, 27.9, 29.4, 31.2, 33.0, 34.6]
      }
    }"#
}

/// Mahanadi delta: today's discharge of 152.6 m³/s is above the flood
/// threshold.
pub(crate) fn fixture_flood_high_discharge_json() -> &'static str {
    r#"{
      "latitude": 20.175,
      "longitude": 85.725,
      "generationtime_ms": 0.2,
      "utc_offset_seconds": 0,
      "timezone": "GMT",
      "timezone_abbreviation": "GMT",
      "daily_units": { "time": "iso8601", "river_discharge": "m³/s" },
      "daily": {
        "time": ["2024-05-01", "2024-05-02", "2024-05-03"],
        "river_discharge": [152.6, 148.1, 139.9]
      }
    }"#
}

/// Flood series whose first value is missing.
pub(crate) fn fixture_flood_null_discharge_json() -> &'static str {
    r#"{
      "latitude": 20.175,
      "longitude": 85.725,
      "daily_units": { "time": "iso8601", "river_discharge": "m³/s" },
      "daily": {
        "time": ["2024-05-01", "2024-05-02"],
        "river_discharge": [null, 210.0]
      }
    }"#
}

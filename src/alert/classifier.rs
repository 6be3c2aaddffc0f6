//! Hazard classification.
//!
//! Conditions are evaluated in two tiers:
//!
//! 1. Storm vs. heavy rain (mutually exclusive; storm wins).
//! 2. High river discharge (independent of tier 1, appended after it).
//!
//! If neither tier fires, a single "safe" alert is produced, so the result
//! is never empty and holds at most two alerts.

use crate::model::{Alert, AlertType, FloodSignal, WeatherSignal};
use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Wind speed above which a storm alert is raised, in km/h.
pub const STORM_WIND_KMH: f64 = 50.0;

/// Current precipitation above which a heavy-rain alert is raised, in mm.
pub const HEAVY_RAIN_MM: f64 = 10.0;

/// Forecast river discharge above which a flood alert is raised.
pub const HIGH_DISCHARGE: f64 = 100.0;

/// WMO codes for rain (61/63/65) and thunderstorm (95/96/99) conditions.
pub const STORM_WEATHER_CODES: [i64; 6] = [61, 63, 65, 95, 96, 99];

const STORM_MESSAGE: &str =
    "Potential cyclone or severe storm detected! High winds and heavy rain expected.";
const FLOOD_MESSAGE: &str = "High river discharge detected. Flood risk elevated in your area.";
const SAFE_MESSAGE: &str = "No threat nearby. Conditions are currently safe.";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies the given signals using the current time as the alert timestamp.
pub fn classify(weather: &WeatherSignal, flood: &FloodSignal) -> Vec<Alert> {
    classify_at(weather, flood, Utc::now())
}

/// Classifies the given signals, stamping every alert with `now`.
pub fn classify_at(weather: &WeatherSignal, flood: &FloodSignal, now: DateTime<Utc>) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(2);

    if let Some(alert) = weather_alert(weather, now) {
        alerts.push(alert);
    }

    if flood.river_discharge > HIGH_DISCHARGE {
        alerts.push(Alert::new(AlertType::Flood, FLOOD_MESSAGE, now));
    }

    if alerts.is_empty() {
        alerts.push(Alert::new(AlertType::Safe, SAFE_MESSAGE, now));
    }

    alerts
}

/// Tier 1: storm takes priority over heavy rain.
fn weather_alert(weather: &WeatherSignal, now: DateTime<Utc>) -> Option<Alert> {
    if is_storm(weather) {
        Some(Alert::new(AlertType::Cyclone, STORM_MESSAGE, now))
    } else if weather.precipitation_mm > HEAVY_RAIN_MM {
        Some(Alert::new(
            AlertType::Rainfall,
            format!(
                "Heavy rainfall ({} mm) detected. Risk of localized flooding.",
                weather.precipitation_mm
            ),
            now,
        ))
    } else {
        None
    }
}

fn is_storm(weather: &WeatherSignal) -> bool {
    weather.wind_speed_kmh > STORM_WIND_KMH || STORM_WEATHER_CODES.contains(&weather.weather_code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

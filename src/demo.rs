//! Demo scenario served when a request sets `fake=true`.
//!
//! A severe-storm-with-flooding situation, used by front-end developers to
//! exercise alert and map rendering without waiting for real weather. The
//! scenario is an immutable value owned by the request handler and rendered
//! per request against the caller's coordinates, so concurrent requests never
//! observe each other's locations.

use crate::model::{Alert, AlertType, Coordinates, FloodZone, WeatherReport, ZoneSeverity};
use chrono::{DateTime, Utc};
use serde_json::Number;

/// A zone positioned relative to the requested location.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoZone {
    pub id: u32,
    pub severity: ZoneSeverity,
    /// Added to both latitude and longitude of the request.
    pub center_offset: f64,
    pub radius: u32,
    pub water_level: f64,
}

/// A canned alert; the timestamp is filled in when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoAlert {
    pub alert_type: AlertType,
    pub message: String,
}

/// Current conditions reported for every location.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConditions {
    pub temperature: i64,
    pub humidity: i64,
    pub precipitation: i64,
    pub wind_speed: i64,
    pub weather_code: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoScenario {
    pub conditions: DemoConditions,
    pub zones: Vec<DemoZone>,
    pub alerts: Vec<DemoAlert>,
}

impl Default for DemoScenario {
    fn default() -> Self {
        Self {
            conditions: DemoConditions {
                temperature: 28,
                humidity: 90,
                precipitation: 50,
                wind_speed: 70,
                weather_code: 95, // thunderstorm with heavy rain
            },
            zones: vec![
                DemoZone {
                    id: 1,
                    severity: ZoneSeverity::Severe,
                    center_offset: 0.01,
                    radius: 2000,
                    water_level: 5.0,
                },
                DemoZone {
                    id: 2,
                    severity: ZoneSeverity::Moderate,
                    center_offset: -0.015,
                    radius: 1500,
                    water_level: 3.0,
                },
            ],
            alerts: vec![
                DemoAlert {
                    alert_type: AlertType::Cyclone,
                    message: "Cyclone warning! Winds up to 70 km/h and heavy rain detected nearby."
                        .to_string(),
                },
                DemoAlert {
                    alert_type: AlertType::Flood,
                    message: "Severe flooding reported nearby. Seek higher ground!".to_string(),
                },
            ],
        }
    }
}

impl DemoScenario {
    pub fn weather_at(&self, at: Coordinates) -> WeatherReport {
        let c = &self.conditions;
        WeatherReport {
            lat: at.lat,
            lon: at.lon,
            temperature: Some(Number::from(c.temperature)),
            humidity: Some(Number::from(c.humidity)),
            precipitation: Some(Number::from(c.precipitation)),
            wind_speed: Some(Number::from(c.wind_speed)),
            weather_code: Some(Number::from(c.weather_code)),
        }
    }

    pub fn zones_around(&self, at: Coordinates) -> Vec<FloodZone> {
        self.zones
            .iter()
            .map(|z| {
                let center = at.offset(z.center_offset);
                FloodZone {
                    id: z.id,
                    severity: z.severity,
                    center: [center.lat, center.lon],
                    radius: z.radius,
                    water_level: z.water_level,
                }
            })
            .collect()
    }

    pub fn alerts_at(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.alerts
            .iter()
            .map(|a| Alert::new(a.alert_type, a.message.clone(), now))
            .collect()
    }
}

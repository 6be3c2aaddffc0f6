//! HTTP endpoint for flood, weather and alert data.
//!
//! A thin JSON API over the Open-Meteo forecast and flood services, intended
//! for a map-based front end.
//!
//! Endpoints (all GET; `lat`, `lon` and `fake` query parameters where noted):
//! - GET /api/floods          - flood summary (lat, lon)
//! - GET /api/rainfall        - next 5 hours of precipitation (lat, lon)
//! - GET /api/shelters        - emergency shelters
//! - GET /api/weather         - current conditions (lat, lon, fake)
//! - GET /api/flood-zones     - flood zones (lat, lon, fake)
//! - GET /api/live-updates    - hazard alerts (lat, lon, fake)
//! - GET /api/hourly-weather  - next 8 hours of temperature (lat, lon)
//! - GET /health              - service health check
//!
//! Every `/api/*` response carries `Access-Control-Allow-Origin`, and
//! `OPTIONS` preflight requests are answered directly.

use crate::alert::classify;
use crate::config::{DefaultLocations, ServerConfig, ServiceConfig};
use crate::demo::DemoScenario;
use crate::ingest::{ForecastProvider, HourlySeries, HourlyVariable, UpstreamError};
use crate::logging::{DataSource, log_upstream_failure};
use crate::model::{
    Coordinates, FloodSignal, FloodSummary, HourlyForecast, HourlyTemperature, RainfallReport,
    WeatherReport, WeatherSignal,
};
use crate::{shelters, zones};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use threadpool::ThreadPool;
use tiny_http::Method;

/// Hourly precipitation values returned by `/api/rainfall`.
pub const RAINFALL_HOURS: usize = 5;

/// Hourly temperatures returned by `/api/hourly-weather`.
pub const HOURLY_FORECAST_HOURS: usize = 8;

pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/api/floods",
    "/api/rainfall",
    "/api/shelters",
    "/api/weather",
    "/api/flood-zones",
    "/api/live-updates",
    "/api/hourly-weather",
    "/health",
];

// ---------------------------------------------------------------------------
// Response Type
// ---------------------------------------------------------------------------

/// Transport-independent response produced by `ApiHandler`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// JSON body; `None` for bodiless responses (204).
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(&'static str, String)>,
}

impl ApiResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
            headers: Vec::new(),
        }
    }

    fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into a `tiny_http` response with a pretty-printed JSON body.
    pub fn into_http(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let bytes = match &self.body {
            Some(body) => serde_json::to_vec_pretty(body).unwrap_or_default(),
            None => Vec::new(),
        };

        let mut response = tiny_http::Response::from_data(bytes)
            .with_status_code(tiny_http::StatusCode::from(self.status));

        if self.body.is_some() {
            let content_type =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]);
            if let Ok(h) = content_type {
                response.add_header(h);
            }
        }

        for (name, value) in &self.headers {
            match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(h) => response.add_header(h),
                Err(()) => tracing::warn!(header = name, "dropping invalid response header"),
            }
        }

        response
    }
}

/// Serializes `value` into a JSON response.
fn json_response<T: Serialize>(status: u16, value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(body) => ApiResponse::json(status, body),
        Err(e) => ApiResponse::json(
            500,
            json!({ "error": "Failed to serialize response", "message": e.to_string() }),
        ),
    }
}

fn fetch_failure(error: &str, err: &UpstreamError) -> ApiResponse {
    ApiResponse::json(500, json!({ "error": error, "message": err.to_string() }))
}

// ---------------------------------------------------------------------------
// Query Parsing
// ---------------------------------------------------------------------------

/// Decoded query-string parameters. The first occurrence of a key wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let mut params = HashMap::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(decode_component(key))
                .or_insert_with(|| decode_component(value));
        }

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses `key` as a float, falling back to `default` when the key is
    /// missing or not a number.
    pub fn float_or(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// `lat`/`lon`, each independently defaulted.
    pub fn coordinates_or(&self, default: Coordinates) -> Coordinates {
        Coordinates::new(self.float_or("lat", default.lat), self.float_or("lon", default.lon))
    }

    /// True only when `key` is `"true"` (any case).
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(|s| s.into_owned());
    decoded.unwrap_or(spaced)
}

/// Splits a request URL into path and query parameters.
pub fn split_url(url: &str) -> (&str, QueryParams) {
    match url.split_once('?') {
        Some((path, query)) => (path, QueryParams::parse(query)),
        None => (url, QueryParams::default()),
    }
}

// ---------------------------------------------------------------------------
// Request Handling
// ---------------------------------------------------------------------------

/// Routes requests to the endpoint handlers. Shared read-only across worker
/// threads.
pub struct ApiHandler<P> {
    provider: P,
    defaults: DefaultLocations,
    demo: DemoScenario,
    cors_allow_origin: String,
}

impl<P: ForecastProvider> ApiHandler<P> {
    pub fn new(provider: P, config: &ServiceConfig) -> Self {
        Self {
            provider,
            defaults: config.defaults.clone(),
            demo: DemoScenario::default(),
            cors_allow_origin: config.server.cors_allow_origin.clone(),
        }
    }

    /// Replaces the demo scenario served for `fake=true` requests.
    pub fn with_demo(mut self, demo: DemoScenario) -> Self {
        self.demo = demo;
        self
    }

    pub fn handle(&self, method: &Method, url: &str) -> ApiResponse {
        let (path, query) = split_url(url);
        let is_api = path.starts_with("/api/");

        let response = match method {
            Method::Get => self.route(path, &query),
            Method::Options if is_api => ApiResponse::empty(204)
                .with_header("Access-Control-Allow-Methods", "GET, OPTIONS")
                .with_header("Access-Control-Allow-Headers", "*")
                .with_header("Access-Control-Max-Age", "86400"),
            _ => ApiResponse::json(405, json!({ "error": "Method not allowed" }))
                .with_header("Allow", "GET, OPTIONS"),
        };

        if is_api {
            response.with_header("Access-Control-Allow-Origin", self.cors_allow_origin.clone())
        } else {
            response
        }
    }

    fn route(&self, path: &str, query: &QueryParams) -> ApiResponse {
        let at = query.coordinates_or(self.defaults.general());
        let fake = query.flag("fake");

        match path {
            "/api/floods" => self.floods(query.coordinates_or(self.defaults.flood())),
            "/api/rainfall" => self.rainfall(at),
            "/api/shelters" => {
                json_response(200, &json!({ "shelters": shelters::all_shelters() }))
            }
            "/api/weather" => self.weather(at, fake),
            "/api/flood-zones" => self.flood_zones(at, fake),
            "/api/live-updates" => self.live_updates(at, fake),
            "/api/hourly-weather" => self.hourly_weather(at),
            "/health" => handle_health(),
            _ => ApiResponse::json(
                404,
                json!({
                    "error": "Not found",
                    "available_endpoints": AVAILABLE_ENDPOINTS,
                }),
            ),
        }
    }

    /// Handle /api/floods
    fn floods(&self, at: Coordinates) -> ApiResponse {
        match self.provider.flood_forecast(at) {
            Ok(forecast) => json_response(
                200,
                &FloodSummary {
                    latitude: at.lat,
                    longitude: at.lon,
                    flood_risk: forecast.flood_risk.unwrap_or_else(|| json!("No data")),
                    water_level: forecast.water_level.unwrap_or_else(|| json!("Unknown")),
                    risk_description: forecast
                        .risk_description
                        .unwrap_or_else(|| json!("No risk detected")),
                },
            ),
            Err(e) => {
                log_upstream_failure(DataSource::Flood, at, "flood forecast", &e);
                match e.status_code() {
                    Some(code) => ApiResponse::json(
                        500,
                        json!({ "error": "Failed to fetch flood data", "status_code": code }),
                    ),
                    None => fetch_failure("Failed to fetch flood data", &e),
                }
            }
        }
    }

    /// Handle /api/rainfall
    fn rainfall(&self, at: Coordinates) -> ApiResponse {
        match self.provider.hourly(at, HourlyVariable::Precipitation) {
            Ok(series) => json_response(
                200,
                &RainfallReport {
                    lat: at.lat,
                    lon: at.lon,
                    rainfall: series.precipitation.into_iter().take(RAINFALL_HOURS).collect(),
                },
            ),
            Err(e) => {
                log_upstream_failure(DataSource::Forecast, at, "hourly precipitation", &e);
                fetch_failure("Failed to fetch rainfall data", &e)
            }
        }
    }

    /// Handle /api/weather
    fn weather(&self, at: Coordinates, fake: bool) -> ApiResponse {
        if fake {
            return json_response(200, &self.demo.weather_at(at));
        }

        match self.provider.current_conditions(at) {
            Ok(current) => json_response(
                200,
                &WeatherReport {
                    lat: at.lat,
                    lon: at.lon,
                    temperature: current.temperature_2m,
                    humidity: current.relative_humidity_2m,
                    precipitation: current.precipitation,
                    wind_speed: current.wind_speed_10m,
                    weather_code: current.weather_code,
                },
            ),
            Err(e) => {
                log_upstream_failure(DataSource::Forecast, at, "current conditions", &e);
                fetch_failure("Failed to fetch weather data", &e)
            }
        }
    }

    /// Handle /api/flood-zones
    fn flood_zones(&self, at: Coordinates, fake: bool) -> ApiResponse {
        if fake {
            json_response(200, &self.demo.zones_around(at))
        } else {
            json_response(200, &zones::all_zones())
        }
    }

    /// Handle /api/live-updates
    ///
    /// Upstream failures degrade to default signals rather than an error, so
    /// the caller always receives at least one alert.
    fn live_updates(&self, at: Coordinates, fake: bool) -> ApiResponse {
        if fake {
            return json_response(200, &self.demo.alerts_at(Utc::now()));
        }

        let weather = match self.provider.current_conditions(at) {
            Ok(current) => current.to_signal(),
            Err(e) => {
                log_upstream_failure(DataSource::Forecast, at, "current conditions", &e);
                WeatherSignal::default()
            }
        };

        let flood = match self.provider.flood_forecast(at) {
            Ok(forecast) => forecast.to_signal(),
            Err(e) => {
                log_upstream_failure(DataSource::Flood, at, "flood forecast", &e);
                FloodSignal::default()
            }
        };

        let alerts = classify(&weather, &flood);
        tracing::debug!(
            lat = at.lat,
            lon = at.lon,
            wind_kmh = weather.wind_speed_kmh,
            precip_mm = weather.precipitation_mm,
            code = weather.weather_code,
            discharge = flood.river_discharge,
            alerts = alerts.len(),
            "classified live conditions"
        );

        json_response(200, &alerts)
    }

    /// Handle /api/hourly-weather
    fn hourly_weather(&self, at: Coordinates) -> ApiResponse {
        let forecast = self
            .provider
            .hourly(at, HourlyVariable::Temperature)
            .and_then(|series| hourly_temperatures(&series));

        match forecast {
            Ok(forecast) => json_response(
                200,
                &HourlyForecast {
                    lat: at.lat,
                    lon: at.lon,
                    forecast,
                },
            ),
            Err(e) => {
                log_upstream_failure(DataSource::Forecast, at, "hourly temperature", &e);
                fetch_failure("Failed to fetch hourly weather data", &e)
            }
        }
    }
}

/// Handle /health endpoint
fn handle_health() -> ApiResponse {
    ApiResponse::json(
        200,
        json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Pairs hourly timestamps with temperatures, keeping the first
/// `HOURLY_FORECAST_HOURS` entries.
fn hourly_temperatures(series: &HourlySeries) -> Result<Vec<HourlyTemperature>, UpstreamError> {
    series
        .time
        .iter()
        .zip(&series.temperature_2m)
        .take(HOURLY_FORECAST_HOURS)
        .map(|(time, temp)| -> Result<HourlyTemperature, UpstreamError> {
            Ok(HourlyTemperature {
                time: format_hour(time)?,
                temp: *temp,
            })
        })
        .collect()
}

/// Formats an upstream ISO 8601 local time (`"2024-05-01T19:00"`) as a
/// 12-hour label (`"07 PM"`).
pub fn format_hour(time: &str) -> Result<String, UpstreamError> {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S"))
        .map(|dt| dt.format("%I %p").to_string())
        .map_err(|e| UpstreamError::Parse(format!("Invalid hourly timestamp {:?}: {}", time, e)))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Failed to start HTTP server on {addr}: {message}")]
    Bind { addr: String, message: String },
}

/// Binds the configured address and serves requests until the process exits.
pub fn start_endpoint_server<P>(
    config: &ServerConfig,
    handler: ApiHandler<P>,
) -> Result<(), EndpointError>
where
    P: ForecastProvider + 'static,
{
    let addr = config.listen_addr();
    let server = tiny_http::Server::http(&addr).map_err(|e| EndpointError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;

    tracing::info!(addr = %addr, workers = config.workers, "HTTP endpoint listening");
    for endpoint in AVAILABLE_ENDPOINTS {
        tracing::info!("   GET {}", endpoint);
    }

    serve(server, handler, config.workers);
    Ok(())
}

/// Accepts requests from `server` and dispatches each to a worker thread.
///
/// Returns once the server stops yielding requests (e.g. after `unblock`).
pub fn serve<P>(server: tiny_http::Server, handler: ApiHandler<P>, workers: usize)
where
    P: ForecastProvider + 'static,
{
    let handler = Arc::new(handler);
    let pool = ThreadPool::new(workers.max(1));

    for request in server.incoming_requests() {
        let handler = Arc::clone(&handler);
        pool.execute(move || respond(&handler, request));
    }

    pool.join();
}

fn respond<P: ForecastProvider>(handler: &ApiHandler<P>, request: tiny_http::Request) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();

    let response = handler.handle(&method, &url);
    let status = response.status;

    if let Err(e) = request.respond(response.into_http()) {
        tracing::warn!(error = %e, "Failed to send response");
    }

    let path = url.split('?').next().unwrap_or_default();
    tracing::info!(
        method = %method,
        path,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

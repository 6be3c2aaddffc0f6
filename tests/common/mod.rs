//! Shared helpers for integration tests: a loopback mock of the Open-Meteo
//! forecast and flood APIs.

#![allow(dead_code)]

use floodwatch_service::config::ServiceConfig;
use std::sync::{Arc, Mutex};
use std::thread;

pub const THUNDERSTORM_CURRENT: &str = r#"{
  "latitude": 20.175,
  "longitude": 85.725,
  "current_units": { "wind_speed_10m": "km/h", "precipitation": "mm" },
  "current": {
    "time": "2024-05-01T12:00",
    "interval": 900,
    "temperature_2m": 29.0,
    "relative_humidity_2m": 91,
    "precipitation": 22.5,
    "wind_speed_10m": 74.0,
    "weather_code": 95
  }
}"#;

pub const DRIZZLE_CURRENT: &str = r#"{
  "current": {
    "time": "2024-05-01T12:00",
    "temperature_2m": 24.0,
    "relative_humidity_2m": 70,
    "precipitation": 15.0,
    "wind_speed_10m": 12.0,
    "weather_code": 53
  }
}"#;

pub const HIGH_DISCHARGE: &str = r#"{
  "daily_units": { "river_discharge": "m³/s" },
  "daily": {
    "time": ["2024-05-01", "2024-05-02"],
    "river_discharge": [150.0, 131.2]
  }
}"#;

pub const LOW_DISCHARGE: &str = r#"{
  "daily": {
    "time": ["2024-05-01"],
    "river_discharge": [12.4]
  }
}"#;

pub const HOURLY_TEMPERATURE: &str = r#"{
  "hourly": {
    "time": ["2024-05-01T18:00", "2024-05-01T19:00", "2024-05-01T20:00"],
    "temperature_2m": [31.0, 30.2, 29.5]
  }
}"#;

pub const HOURLY_PRECIPITATION: &str = r#"{
  "hourly": {
    "time": [
      "2024-05-01T00:00", "2024-05-01T01:00", "2024-05-01T02:00",
      "2024-05-01T03:00", "2024-05-01T04:00", "2024-05-01T05:00",
      "2024-05-01T06:00"
    ],
    "precipitation": [0.0, 0.1, 0.2, 2.5, 7.0, 3.3, 0.0]
  }
}"#;

/// Canned upstream behaviour: `(status, body)` for each kind of call.
#[derive(Clone)]
pub struct UpstreamScript {
    pub current: (u16, &'static str),
    pub hourly_temperature: (u16, &'static str),
    pub hourly_precipitation: (u16, &'static str),
    pub flood: (u16, &'static str),
}

impl Default for UpstreamScript {
    fn default() -> Self {
        Self {
            current: (200, THUNDERSTORM_CURRENT),
            hourly_temperature: (200, HOURLY_TEMPERATURE),
            hourly_precipitation: (200, HOURLY_PRECIPITATION),
            flood: (200, HIGH_DISCHARGE),
        }
    }
}

pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    /// Request URLs (path + query) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// A default config whose upstream URLs point at this mock.
    pub fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.upstream.forecast_base_url = format!("{}/v1/forecast", self.base_url);
        config.upstream.flood_base_url = format!("{}/v1/flood", self.base_url);
        config.upstream.timeout_secs = 5;
        config
    }
}

/// Starts a mock upstream on an ephemeral loopback port.
pub fn start_mock_upstream(script: UpstreamScript) -> MockUpstream {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("mock upstream should bind");
    let addr = server.server_addr().to_ip().expect("mock upstream should listen on IP");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let url = request.url().to_string();
            seen.lock().unwrap().push(url.clone());

            let (status, body) = if url.starts_with("/v1/flood") {
                script.flood
            } else if url.contains("hourly=temperature_2m") {
                script.hourly_temperature
            } else if url.contains("hourly=precipitation") {
                script.hourly_precipitation
            } else if url.contains("current=") {
                script.current
            } else {
                (400, r#"{"error": true, "reason": "unsupported request"}"#)
            };

            let response = tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    MockUpstream {
        base_url: format!("http://{}", addr),
        requests,
    }
}

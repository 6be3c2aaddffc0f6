//! floodwatch_service: flood, weather and hazard alert API.
//!
//! # Module structure
//!
//! ```text
//! floodwatch_service
//! ├── model       — shared data types (signals, Alert, response payloads)
//! ├── config      — service configuration loader (floodwatch.toml + env)
//! ├── logging     — tracing setup and classified upstream-failure logging
//! ├── alert
//! │   └── classifier — weather + river discharge → prioritized alerts
//! ├── ingest
//! │   ├── open_meteo — Open-Meteo forecast/flood API: URLs + JSON parsing
//! │   └── fixtures (test only) — representative API response payloads
//! ├── demo        — fake-data scenario served for `fake=true`
//! ├── shelters    — emergency shelter registry
//! ├── zones       — static flood zone registry
//! └── endpoint    — HTTP API (routing, CORS, worker pool)
//! ```

pub mod alert;
pub mod config;
pub mod demo;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod shelters;
pub mod zones;

//! Hazard alerting.
//!
//! Submodules:
//! - `classifier` — turns weather and river-discharge signals into a
//!   prioritized alert list.

pub mod classifier;

pub use classifier::{classify, classify_at};

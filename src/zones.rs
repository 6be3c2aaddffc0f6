//! Flood zone registry.
//!
//! Static zones served by `/api/flood-zones` when demo data is not
//! requested. Radius is `0` because no inundation extent is known for these
//! points yet; consumers should render them as markers.

use crate::model::{FloodZone, ZoneSeverity};

pub static FLOOD_ZONE_REGISTRY: &[FloodZone] = &[
    FloodZone {
        id: 1,
        severity: ZoneSeverity::Moderate,
        center: [18.9691, 72.8193],
        radius: 0,
        water_level: 2.5,
    },
    FloodZone {
        id: 2,
        severity: ZoneSeverity::Severe,
        center: [18.9750, 72.8300],
        radius: 0,
        water_level: 4.0,
    },
];

/// All registered flood zones.
pub fn all_zones() -> &'static [FloodZone] {
    FLOOD_ZONE_REGISTRY
}

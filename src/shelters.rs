//! Emergency shelter registry.
//!
//! Placeholder list served by `/api/shelters` until a shelter data source
//! is wired in. Entries are in the Mumbai (Colaba) area.

use crate::model::Shelter;

pub static SHELTER_REGISTRY: &[Shelter] = &[
    Shelter {
        name: "Shelter 1",
        lat: 18.9691,
        lon: 72.8193,
    },
    Shelter {
        name: "Shelter 2",
        lat: 18.9750,
        lon: 72.8300,
    },
];

/// All registered shelters.
pub fn all_shelters() -> &'static [Shelter] {
    SHELTER_REGISTRY
}

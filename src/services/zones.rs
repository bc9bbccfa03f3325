//! Static catalog of monitored zones.
//!
//! Zones are named areas of interest shown as cards on the dashboard. Their
//! priority and degradation figures are curated metadata, not derived from
//! NDVI; the NDVI endpoints only use a zone's coordinates.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Location;

/// Intervention priority assigned to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: &'static str,
    pub name: &'static str,
    pub region: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub priority: Priority,
    /// Share of the zone's area showing vegetation loss, in percent
    pub degradation_percent: f64,
    pub area_hectares: f64,
}

impl Zone {
    /// The zone centre as a `Location` labelled with the zone name.
    pub fn location(&self) -> Option<Location> {
        Location::new(self.latitude, self.longitude).map(|loc| loc.with_name(self.name))
    }
}

static ZONES: [Zone; 5] = [
    Zone {
        id: "santa-cruz-do-sul",
        name: "Santa Cruz do Sul",
        region: "Rio Grande do Sul",
        latitude: -29.7175,
        longitude: -52.4264,
        priority: Priority::High,
        degradation_percent: 34.0,
        area_hectares: 1250.0,
    },
    Zone {
        id: "vale-do-taquari",
        name: "Vale do Taquari",
        region: "Rio Grande do Sul",
        latitude: -29.4520,
        longitude: -51.9650,
        priority: Priority::Critical,
        degradation_percent: 52.0,
        area_hectares: 3400.0,
    },
    Zone {
        id: "serra-gaucha",
        name: "Serra Gaúcha",
        region: "Rio Grande do Sul",
        latitude: -29.1680,
        longitude: -51.1790,
        priority: Priority::Medium,
        degradation_percent: 18.5,
        area_hectares: 2100.0,
    },
    Zone {
        id: "pampa-sul",
        name: "Pampa Sul",
        region: "Rio Grande do Sul",
        latitude: -31.3310,
        longitude: -54.1070,
        priority: Priority::Low,
        degradation_percent: 9.0,
        area_hectares: 5800.0,
    },
    Zone {
        id: "litoral-norte",
        name: "Litoral Norte",
        region: "Rio Grande do Sul",
        latitude: -29.7530,
        longitude: -50.0120,
        priority: Priority::Medium,
        degradation_percent: 22.5,
        area_hectares: 980.0,
    },
];

/// All zones, ordered by descending priority then name.
pub fn all_zones() -> Vec<&'static Zone> {
    let mut zones: Vec<&'static Zone> = ZONES.iter().collect();
    zones.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.name.cmp(b.name)));
    zones
}

/// Look up a zone by its slug.
pub fn find_zone(id: &str) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.id.eq_ignore_ascii_case(id))
}

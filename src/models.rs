//! Domain types shared by the acquisition services and the HTTP layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// One NDVI observation (live) or synthesized sample (fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NdviSample {
    /// Calendar date of the observation (ISO 8601)
    pub date: NaiveDate,
    /// NDVI in [0, 1]
    pub ndvi: f64,
    /// Precipitation in millimetres, never negative
    pub precipitation: f64,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Cloud coverage percentage in [0, 100]
    pub cloud_coverage: f64,
}

/// A validated WGS84 point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Display label, not authoritative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    /// Returns `None` unless both coordinates are finite and in range.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        (lat_ok && lon_ok).then_some(Self {
            latitude,
            longitude,
            name: None,
        })
    }

    /// Build a location from optional coordinates; absent or invalid input
    /// yields `None`.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Named history window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Period {
    #[serde(rename = "30d")]
    Days30,
    #[default]
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "180d")]
    Days180,
    #[serde(rename = "1y")]
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Days30, Period::Days90, Period::Days180, Period::Year];

    pub fn days(self) -> u32 {
        match self {
            Period::Days30 => 30,
            Period::Days90 => 90,
            Period::Days180 => 180,
            Period::Year => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Days30 => "30d",
            Period::Days90 => "90d",
            Period::Days180 => "180d",
            Period::Year => "1y",
        }
    }

    /// Unknown or missing labels resolve to the default window (90d).
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::parse::<Period>) {
            Some(Ok(period)) => period,
            Some(Err(_)) => {
                tracing::debug!("Unknown period {:?}, using {}", raw, Period::default());
                Period::default()
            }
            None => Period::default(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown period '{}'", s))
    }
}

/// Backend-reported quality of a point reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Lenient parse used at the backend boundary; anything unrecognised is `Medium`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Quality::Low,
            Some("high") => Quality::High,
            _ => Quality::Medium,
        }
    }
}

/// Point-in-time NDVI reading for the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentNdvi {
    /// NDVI in [0, 1]
    pub value: f64,
    pub quality: Quality,
    /// Cloud coverage percentage in [0, 100]
    pub cloud_coverage: f64,
    pub date: NaiveDate,
}

/// Which path produced an acquisition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Synthetic,
}

impl DataOrigin {
    pub fn is_synthetic(self) -> bool {
        self == DataOrigin::Synthetic
    }
}

/// Acquisition result tagged with its origin.
#[derive(Debug, Clone)]
pub struct Acquired<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Acquired<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Live,
        }
    }

    pub fn synthetic(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Synthetic,
        }
    }
}

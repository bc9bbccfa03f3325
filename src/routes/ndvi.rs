//! NDVI HTTP endpoints.
//!
//! - GET /api/v1/ndvi/timeseries?lat=..&lon=..&period=30d|90d|180d|1y
//! - GET /api/v1/ndvi/current?lat=..&lon=..
//!
//! Both always answer with data. When the NDVI backend was not used or
//! failed, the body says `"origin": "synthetic"` and the response carries
//! `X-Ndvi-Simulated: true`.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::config::AppConfig;
use crate::errors::{AppError, ErrorResponse};
use crate::models::{Acquired, CurrentNdvi, DataOrigin, Location, NdviSample, Period};
use crate::services::acquisition::NdviService;
use crate::services::ndvi_api::NdviApiClient;
use crate::services::statistics::{compute_statistics, NdviStatistics};

/// Response header set when any part of the body was synthesized.
pub(crate) const SIMULATED_HEADER: &str = "X-Ndvi-Simulated";

/// Shared application state for NDVI, zone and map endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) ndvi: NdviService<NdviApiClient>,
    pub(crate) config: Arc<AppConfig>,
}

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
pub struct TimeSeriesQuery {
    /// Latitude in degrees (WGS84). Omit together with `lon` for demo data.
    pub lat: Option<f64>,
    /// Longitude in degrees (WGS84)
    pub lon: Option<f64>,
    /// History window: "30d", "90d", "180d" or "1y" (default "90d")
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PointQuery {
    /// Latitude in degrees (WGS84)
    pub lat: Option<f64>,
    /// Longitude in degrees (WGS84)
    pub lon: Option<f64>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// NDVI series for the chart widget.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSeriesResponse {
    /// Requested location; null when none was given
    pub location: Option<Location>,
    pub period: Period,
    /// Window length in days
    pub days: u32,
    /// "live" when served from the NDVI backend, "synthetic" otherwise
    pub origin: DataOrigin,
    /// Samples ordered by date, oldest first
    pub samples: Vec<NdviSample>,
    /// Summary over `samples`
    pub statistics: Option<NdviStatistics>,
}

/// Point NDVI reading for the map widget.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentResponse {
    pub location: Option<Location>,
    pub origin: DataOrigin,
    pub current: CurrentNdvi,
}

/// Validate optional coordinates.
///
/// Both absent (or only one given) means "no location yet" and is accepted.
/// A full pair must be finite and within WGS84 bounds.
pub(crate) fn validate_coordinates(
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Option<Location>, AppError> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Ok(None);
    };

    // is_finite() first: NaN passes neither range comparison.
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::BadRequest(
            "lat must be a finite number between -90 and 90".to_string(),
        ));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::BadRequest(
            "lon must be a finite number between -180 and 180".to_string(),
        ));
    }

    Ok(Location::new(lat, lon))
}

pub(crate) fn simulated_headers(origins: &[DataOrigin]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if origins.iter().any(|o| o.is_synthetic()) {
        headers.insert(SIMULATED_HEADER, HeaderValue::from_static("true"));
    }
    headers
}

pub(crate) fn build_timeseries_response(
    location: Option<Location>,
    period: Period,
    acquired: Acquired<Vec<NdviSample>>,
) -> TimeSeriesResponse {
    let statistics = compute_statistics(&acquired.data);
    TimeSeriesResponse {
        location,
        period,
        days: period.days(),
        origin: acquired.origin,
        samples: acquired.data,
        statistics,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Get an NDVI time series for a location.
///
/// Tries the NDVI backend once; on any failure (or when no location is
/// given) returns a synthetic weekly series instead. Never fails for valid
/// or absent coordinates.
#[utoipa::path(
    get,
    path = "/api/v1/ndvi/timeseries",
    tag = "NDVI",
    params(TimeSeriesQuery),
    responses(
        (status = 200, description = "NDVI series with summary statistics", body = TimeSeriesResponse,
         headers(
             ("X-Ndvi-Simulated" = String, description = "Set to 'true' when the series was synthesized")
         )),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
    )
)]
pub async fn get_timeseries(
    State(state): State<AppState>,
    Query(params): Query<TimeSeriesQuery>,
) -> Result<(HeaderMap, Json<TimeSeriesResponse>), AppError> {
    let location = validate_coordinates(params.lat, params.lon)?;
    let period = Period::parse_or_default(params.period.as_deref());

    let acquired = match &location {
        Some(loc) => state.ndvi.get_time_series_at(loc, period).await,
        None => state.ndvi.get_time_series(None, None, period).await,
    };

    let headers = simulated_headers(&[acquired.origin]);
    Ok((headers, Json(build_timeseries_response(location, period, acquired))))
}

/// Get the current NDVI reading for a location.
#[utoipa::path(
    get,
    path = "/api/v1/ndvi/current",
    tag = "NDVI",
    params(PointQuery),
    responses(
        (status = 200, description = "Current NDVI reading", body = CurrentResponse,
         headers(
             ("X-Ndvi-Simulated" = String, description = "Set to 'true' when the reading was synthesized")
         )),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
    )
)]
pub async fn get_current(
    State(state): State<AppState>,
    Query(params): Query<PointQuery>,
) -> Result<(HeaderMap, Json<CurrentResponse>), AppError> {
    let location = validate_coordinates(params.lat, params.lon)?;

    let acquired = match &location {
        Some(loc) => state.ndvi.get_current_ndvi_at(loc).await,
        None => state.ndvi.get_current_ndvi(None, None).await,
    };

    let headers = simulated_headers(&[acquired.origin]);
    Ok((
        headers,
        Json(CurrentResponse {
            location,
            origin: acquired.origin,
            current: acquired.data,
        }),
    ))
}

/// Demo-mode state: no NDVI backend, so every response is synthesized.
#[cfg(test)]
pub(crate) fn demo_state() -> AppState {
    AppState {
        ndvi: NdviService::new(None),
        config: Arc::new(AppConfig::from_lookup(|_| None)),
    }
}

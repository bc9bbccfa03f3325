//! Zone HTTP endpoints.
//!
//! - GET /api/v1/zones
//! - GET /api/v1/zones/:id
//! - GET /api/v1/zones/:id/ndvi?period=..

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{CurrentNdvi, DataOrigin, Period};
use crate::routes::ndvi::{
    build_timeseries_response, simulated_headers, AppState, TimeSeriesResponse,
};
use crate::services::zones::{all_zones, find_zone, Priority, Zone};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ZoneNdviQuery {
    /// History window: "30d", "90d", "180d" or "1y" (default "90d")
    pub period: Option<String>,
}

/// Zone card metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneResponse {
    /// Zone slug (e.g. "santa-cruz-do-sul")
    pub id: String,
    pub name: String,
    pub region: String,
    /// Latitude of the zone centre (WGS84)
    pub latitude: f64,
    /// Longitude of the zone centre (WGS84)
    pub longitude: f64,
    pub priority: Priority,
    /// Share of the area showing vegetation loss, in percent
    pub degradation_percent: f64,
    pub area_hectares: f64,
}

impl From<&Zone> for ZoneResponse {
    fn from(z: &Zone) -> Self {
        Self {
            id: z.id.to_string(),
            name: z.name.to_string(),
            region: z.region.to_string(),
            latitude: z.latitude,
            longitude: z.longitude,
            priority: z.priority,
            degradation_percent: z.degradation_percent,
            area_hectares: z.area_hectares,
        }
    }
}

/// A zone with its latest NDVI reading (zone overview).
#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneListItem {
    pub zone: ZoneResponse,
    pub origin: DataOrigin,
    pub current: CurrentNdvi,
}

/// Everything the zone detail panel needs in one call.
#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneNdviResponse {
    pub zone: ZoneResponse,
    pub series: TimeSeriesResponse,
    pub current_origin: DataOrigin,
    pub current: CurrentNdvi,
}

fn lookup_zone(id: &str) -> Result<&'static Zone, AppError> {
    find_zone(id).ok_or_else(|| AppError::NotFound(format!("Zone {} not found", id)))
}

/// List all zones with their current NDVI.
///
/// Point readings for all zones are fetched concurrently.
#[utoipa::path(
    get,
    path = "/api/v1/zones",
    tag = "Zones",
    responses(
        (status = 200, description = "Zones ordered by priority, with current NDVI", body = Vec<ZoneListItem>,
         headers(
             ("X-Ndvi-Simulated" = String, description = "Set to 'true' when any reading was synthesized")
         )),
    )
)]
pub async fn list_zones(State(state): State<AppState>) -> (HeaderMap, Json<Vec<ZoneListItem>>) {
    let zones = all_zones();

    let readings = join_all(zones.iter().map(|zone| {
        let ndvi = &state.ndvi;
        async move {
            match zone.location() {
                Some(loc) => ndvi.get_current_ndvi_at(&loc).await,
                None => ndvi.get_current_ndvi(None, None).await,
            }
        }
    }))
    .await;

    let origins: Vec<DataOrigin> = readings.iter().map(|r| r.origin).collect();
    let items: Vec<ZoneListItem> = zones
        .into_iter()
        .zip(readings)
        .map(|(zone, reading)| ZoneListItem {
            zone: ZoneResponse::from(zone),
            origin: reading.origin,
            current: reading.data,
        })
        .collect();

    (simulated_headers(&origins), Json(items))
}

/// Get a single zone.
#[utoipa::path(
    get,
    path = "/api/v1/zones/{id}",
    tag = "Zones",
    params(
        ("id" = String, Path, description = "Zone slug"),
    ),
    responses(
        (status = 200, description = "Zone metadata", body = ZoneResponse),
        (status = 404, description = "Zone not found", body = ErrorResponse),
    )
)]
pub async fn get_zone(Path(id): Path<String>) -> Result<Json<ZoneResponse>, AppError> {
    let zone = lookup_zone(&id)?;
    Ok(Json(ZoneResponse::from(zone)))
}

/// Get the NDVI series, statistics and current reading for a zone.
#[utoipa::path(
    get,
    path = "/api/v1/zones/{id}/ndvi",
    tag = "Zones",
    params(
        ("id" = String, Path, description = "Zone slug"),
        ZoneNdviQuery,
    ),
    responses(
        (status = 200, description = "Zone NDVI panel data", body = ZoneNdviResponse,
         headers(
             ("X-Ndvi-Simulated" = String, description = "Set to 'true' when any part was synthesized")
         )),
        (status = 404, description = "Zone not found", body = ErrorResponse),
    )
)]
pub async fn get_zone_ndvi(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ZoneNdviQuery>,
) -> Result<(HeaderMap, Json<ZoneNdviResponse>), AppError> {
    let zone = lookup_zone(&id)?;
    let period = Period::parse_or_default(params.period.as_deref());
    let location = zone.location().ok_or_else(|| {
        AppError::InternalError(format!("Zone {} has invalid coordinates", zone.id))
    })?;

    let (series, current) = futures::join!(
        state.ndvi.get_time_series_at(&location, period),
        state.ndvi.get_current_ndvi_at(&location),
    );

    let headers = simulated_headers(&[series.origin, current.origin]);
    Ok((
        headers,
        Json(ZoneNdviResponse {
            zone: ZoneResponse::from(zone),
            series: build_timeseries_response(Some(location), period, series),
            current_origin: current.origin,
            current: current.data,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ndvi::{demo_state, SIMULATED_HEADER};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_lookup_zone_not_found() {
        assert!(matches!(lookup_zone("nowhere"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_zone_response_from_zone() {
        let zone = lookup_zone("vale-do-taquari").unwrap();
        let response = ZoneResponse::from(zone);
        assert_eq!(response.name, "Vale do Taquari");
        assert_eq!(response.priority, Priority::Critical);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["priority"], "critical");
    }

    #[tokio::test]
    async fn test_get_zone_ndvi_demo_mode() {
        let (headers, Json(body)) = get_zone_ndvi(
            State(demo_state()),
            Path("santa-cruz-do-sul".to_string()),
            Query(ZoneNdviQuery {
                period: Some("30d".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(headers.get(SIMULATED_HEADER).unwrap(), "true");
        assert_eq!(body.zone.id, "santa-cruz-do-sul");
        assert_eq!(body.series.origin, DataOrigin::Synthetic);
        assert_eq!(body.series.samples.len(), 5);
        assert_eq!(body.current_origin, DataOrigin::Synthetic);
    }

    #[tokio::test]
    async fn test_get_zone_ndvi_unknown_zone() {
        let err = get_zone_ndvi(
            State(demo_state()),
            Path("atlantis".to_string()),
            Query(ZoneNdviQuery { period: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_zone_unknown_zone() {
        let err = get_zone(Path("atlantis".to_string())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_zones_demo_mode() {
        let (headers, Json(items)) = list_zones(State(demo_state())).await;

        assert_eq!(headers.get(SIMULATED_HEADER).unwrap(), "true");
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].zone.priority, Priority::Critical);
        assert!(items.iter().all(|i| i.origin == DataOrigin::Synthetic));
    }
}

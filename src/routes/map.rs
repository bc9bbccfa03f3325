//! Map widget configuration.
//!
//! GET /api/v1/map/config returns the basemap style and access token for the satellite
//! tile provider. Tiles are fetched by the browser directly; this service only
//! hands out the read-only configuration.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::routes::ndvi::AppState;

const TILE_ATTRIBUTION: &str = "© Mapbox © OpenStreetMap © Maxar";

/// Basemap configuration for the map widget.
#[derive(Debug, Serialize, ToSchema)]
pub struct MapConfigResponse {
    /// Style URL of the satellite basemap
    pub style_url: String,
    /// Attribution text the map must display
    pub attribution: String,
    /// Whether a tile access token is configured
    pub token_configured: bool,
    /// Public (browser-side) access token, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl From<&AppConfig> for MapConfigResponse {
    fn from(config: &AppConfig) -> Self {
        Self {
            style_url: config.map_style_url.clone(),
            attribution: TILE_ATTRIBUTION.to_string(),
            token_configured: config.map_tile_token.is_some(),
            access_token: config.map_tile_token.clone(),
        }
    }
}

/// Get the basemap configuration.
#[utoipa::path(
    get,
    path = "/api/v1/map/config",
    tag = "Map",
    responses(
        (status = 200, description = "Basemap configuration", body = MapConfigResponse),
    )
)]
pub async fn get_map_config(State(state): State<AppState>) -> Json<MapConfigResponse> {
    Json(MapConfigResponse::from(state.config.as_ref()))
}

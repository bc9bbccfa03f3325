use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::ndvi::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" with an NDVI backend, "demo" when every response is synthesized)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether an NDVI backend URL is configured
    pub upstream_configured: bool,
}

impl HealthResponse {
    fn new(upstream_configured: bool) -> Self {
        Self {
            status: if upstream_configured {
                "ok".to_string()
            } else {
                "demo".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            upstream_configured,
        }
    }
}

/// Health check endpoint.
///
/// Does not call the NDVI backend: its outages are absorbed by the synthetic
/// fallback and must not make the service look unhealthy.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.ndvi.has_live_source()))
}

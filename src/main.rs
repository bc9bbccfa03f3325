// OrBee NDVI API v0.1
use axum::http::{HeaderName, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::ndvi::AppState;
use services::acquisition::NdviService;
use services::ndvi_api::NdviApiClient;

/// OpenAPI document for the OrBee NDVI API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OrBee NDVI API",
        version = "0.1.0",
        description = "Vegetation-index data for the OrBee monitoring dashboard. \
            Fetches NDVI series and point readings from the NDVI backend and, \
            whenever it is unavailable or no location is selected, serves \
            plausible synthetic data so charts and maps always render.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "NDVI", description = "NDVI time series and point readings"),
        (name = "Zones", description = "Monitored zones and their NDVI"),
        (name = "Map", description = "Basemap configuration"),
    ),
    paths(
        routes::health::health_check,
        routes::ndvi::get_timeseries,
        routes::ndvi::get_current,
        routes::zones::list_zones,
        routes::zones::get_zone,
        routes::zones::get_zone_ndvi,
        routes::map::get_map_config,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::ndvi::TimeSeriesResponse,
            routes::ndvi::CurrentResponse,
            routes::zones::ZoneResponse,
            routes::zones::ZoneListItem,
            routes::zones::ZoneNdviResponse,
            routes::map::MapConfigResponse,
            models::NdviSample,
            models::Location,
            models::Period,
            models::Quality,
            models::CurrentNdvi,
            models::DataOrigin,
            services::statistics::NdviStatistics,
            services::statistics::Trend,
            services::zones::Priority,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orbee_ndvi_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Create NDVI backend client (absent → demo mode)
    let live = match config.ndvi_api_url.as_deref() {
        Some(url) => match NdviApiClient::new(url, &config) {
            Ok(client) => {
                tracing::info!(
                    "NDVI backend at {} (timeout {:?})",
                    url,
                    config.ndvi_timeout
                );
                Some(client)
            }
            Err(e) => {
                tracing::error!("Failed to create NDVI client, serving synthetic data: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("NDVI_API_URL not set, serving synthetic data only");
            None
        }
    };

    if config.map_tile_token.is_none() {
        tracing::warn!("MAP_TILE_TOKEN not set, map widget will have no basemap token");
    }

    // Build shared application state
    let app_state = AppState {
        ndvi: NdviService::new(live),
        config: Arc::new(config.clone()),
    };

    // CORS: read-only API, restrict methods to GET; expose X-Ndvi-Simulated
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-ndvi-simulated")]);

    let ndvi_routes = Router::new()
        .route("/api/v1/ndvi/timeseries", get(routes::ndvi::get_timeseries))
        .route("/api/v1/ndvi/current", get(routes::ndvi::get_current))
        .route("/api/v1/zones", get(routes::zones::list_zones))
        .route("/api/v1/zones/:id", get(routes::zones::get_zone))
        .route("/api/v1/zones/:id/ndvi", get(routes::zones::get_zone_ndvi))
        .route("/api/v1/map/config", get(routes::map::get_map_config))
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(app_state);

    let app = Router::new()
        .merge(ndvi_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::weather::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status (always "ok" while the process serves requests)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether a server-side OpenWeatherMap key is configured
    pub api_key_configured: bool,
}

/// Health check endpoint.
///
/// Does not call the upstream provider; it only reports that the service is up
/// and whether requests without `apiKey` can be served.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_key_configured: state.default_api_key.is_some(),
    })
}

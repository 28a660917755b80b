pub mod health;
pub mod weather;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ApiDoc;
use weather::AppState;

/// Build the full application router.
///
/// Weather routes are served both at the root and under `/api`.
pub(crate) fn build_router(state: AppState) -> Router {
    // Read-only API: restrict CORS methods to GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    let weather_routes = Router::new()
        .route("/weather", get(weather::get_weather))
        .route("/forecast", get(weather::get_forecast))
        .route("/forecast/daily", get(weather::get_daily_forecast))
        .route("/dashboard", get(weather::get_dashboard))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .merge(weather_routes.clone())
        .nest("/api", weather_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

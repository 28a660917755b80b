// Weather Dashboard API v0.1
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

mod config;
mod errors;
mod routes;
mod services;

use config::AppConfig;
use routes::weather::AppState;
use services::openweather::OpenWeatherClient;

/// Weather Dashboard API OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Dashboard API",
        version = "0.1.0",
        description = "City weather lookup. Relays current conditions and the \
            5-day/3-hour forecast from OpenWeatherMap, and groups the forecast \
            into up to five calendar days for display. Every weather path is \
            also served under the /api prefix (e.g. /api/weather).",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Current weather and forecast lookup by city"),
    ),
    paths(
        routes::health::health_check,
        routes::weather::get_weather,
        routes::weather::get_forecast,
        routes::weather::get_daily_forecast,
        routes::weather::get_dashboard,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            services::grouping::ForecastEntry,
            services::grouping::DayBucket,
            services::grouping::GroupedForecast,
            services::openweather::CurrentWeather,
            services::dashboard::ForecastItemView,
            services::dashboard::ForecastDayView,
            services::dashboard::DashboardView,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "weather_dashboard_api=debug,tower_http=debug".into());
    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if config.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; requests must pass apiKey");
    }

    let client = match OpenWeatherClient::new(&config.base_url) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = routes::build_router(AppState {
        client,
        default_api_key: config.api_key.clone(),
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server terminated unexpectedly: {}", e);
        std::process::exit(1);
    }
}

//! Weather HTTP endpoints.
//!
//! - GET /weather?city=NAME&apiKey=KEY: current conditions, relayed verbatim
//! - GET /forecast?city=NAME&apiKey=KEY: 5-day/3-hour forecast, relayed verbatim
//! - GET /forecast/daily?city=NAME&apiKey=KEY: forecast grouped into up to 5 days
//! - GET /dashboard?city=NAME&apiKey=KEY: current conditions + grouped forecast
//!
//! The router mounts each of these again under `/api` (e.g. `/api/dashboard`).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{AppError, ErrorResponse};
use crate::services::dashboard::{build_dashboard, DashboardView};
use crate::services::grouping::{group_by_day, GroupedForecast};
use crate::services::openweather::OpenWeatherClient;

/// Shared application state for weather endpoints.
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) client: OpenWeatherClient,
    /// Used when a request carries no `apiKey`.
    pub(crate) default_api_key: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CityQuery {
    /// City name, optionally with country code (e.g. "London" or "London,GB")
    #[serde(default)]
    pub city: String,
    /// OpenWeatherMap API key; falls back to the server's configured key
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// A validated lookup: trimmed city plus the key to send upstream.
#[derive(Debug)]
struct Lookup {
    city: String,
    api_key: String,
}

impl AppState {
    fn lookup(&self, params: CityQuery) -> Result<Lookup, AppError> {
        let city = params.city.trim();
        if city.is_empty() {
            return Err(AppError::BadRequest("city is required".to_string()));
        }

        let api_key = params
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.default_api_key.clone())
            .ok_or_else(|| {
                AppError::BadRequest(
                    "apiKey is required (no server default is configured)".to_string(),
                )
            })?;

        Ok(Lookup {
            city: city.to_string(),
            api_key,
        })
    }
}

/// Get current weather for a city.
///
/// Relays the OpenWeatherMap current-weather response unchanged.
#[utoipa::path(
    get,
    path = "/weather",
    tag = "Weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Upstream current-weather JSON, verbatim"),
        (status = 400, description = "Missing city or API key", body = ErrorResponse),
        (status = 500, description = "Upstream unreachable", body = ErrorResponse),
        (status = 502, description = "Upstream returned a non-JSON body", body = ErrorResponse),
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lookup = state.lookup(params)?;
    let raw = state
        .client
        .fetch_current(&lookup.city, &lookup.api_key)
        .await?;
    Ok(Json(raw))
}

/// Get the 5-day/3-hour forecast for a city.
///
/// Relays the OpenWeatherMap forecast response unchanged. Upstream error
/// statuses (e.g. 404 for an unknown city) are passed through.
#[utoipa::path(
    get,
    path = "/forecast",
    tag = "Weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Upstream forecast JSON, verbatim"),
        (status = 400, description = "Missing city or API key", body = ErrorResponse),
        (status = 500, description = "Upstream unreachable", body = ErrorResponse),
        (status = 502, description = "Upstream returned a non-JSON body", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lookup = state.lookup(params)?;
    let raw = state
        .client
        .fetch_forecast(&lookup.city, &lookup.api_key)
        .await?;
    Ok(Json(raw))
}

/// Get the forecast for a city grouped by calendar day.
///
/// Keeps the first five distinct dates; `truncated` tells whether more existed.
#[utoipa::path(
    get,
    path = "/forecast/daily",
    tag = "Weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Forecast grouped into up to five days", body = GroupedForecast),
        (status = 400, description = "Missing city or API key", body = ErrorResponse),
        (status = 500, description = "Upstream unreachable", body = ErrorResponse),
        (status = 502, description = "Forecast entries were malformed", body = ErrorResponse),
    )
)]
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<GroupedForecast>, AppError> {
    let lookup = state.lookup(params)?;
    let entries = state
        .client
        .fetch_forecast_list(&lookup.city, &lookup.api_key)
        .await?;
    let grouped = group_by_day(&entries)?;
    Ok(Json(grouped))
}

/// Get the full dashboard for a city: current conditions and the grouped forecast.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Current weather and 5-day forecast", body = DashboardView),
        (status = 400, description = "Missing city or API key", body = ErrorResponse),
        (status = 500, description = "Upstream unreachable", body = ErrorResponse),
        (status = 502, description = "Upstream data was malformed", body = ErrorResponse),
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let lookup = state.lookup(params)?;
    let view = build_dashboard(&state.client, &lookup.city, &lookup.api_key).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(default_api_key: Option<&str>) -> AppState {
        AppState {
            client: OpenWeatherClient::new("http://localhost").unwrap(),
            default_api_key: default_api_key.map(str::to_string),
        }
    }

    fn query(city: &str, api_key: Option<&str>) -> CityQuery {
        CityQuery {
            city: city.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    #[test]
    fn test_lookup_trims_city() {
        let lookup = state(None).lookup(query("  Oslo ", Some("k"))).unwrap();
        assert_eq!(lookup.city, "Oslo");
        assert_eq!(lookup.api_key, "k");
    }

    #[test]
    fn test_lookup_requires_city() {
        let err = state(Some("k")).lookup(query("   ", None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_lookup_falls_back_to_default_key() {
        let lookup = state(Some("server-key")).lookup(query("Oslo", None)).unwrap();
        assert_eq!(lookup.api_key, "server-key");

        let lookup = state(Some("server-key"))
            .lookup(query("Oslo", Some("")))
            .unwrap();
        assert_eq!(lookup.api_key, "server-key");
    }

    #[test]
    fn test_request_key_overrides_default() {
        let lookup = state(Some("server-key"))
            .lookup(query("Oslo", Some("client-key")))
            .unwrap();
        assert_eq!(lookup.api_key, "client-key");
    }

    #[test]
    fn test_lookup_without_any_key() {
        let err = state(None).lookup(query("Oslo", None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}

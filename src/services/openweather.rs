//! OpenWeatherMap 2.5 client.
//!
//! Relays current-weather and 5-day/3-hour forecast lookups by city name.
//! See: https://openweathermap.org/current and https://openweathermap.org/forecast5

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::grouping::ForecastEntry;

/// Temperatures are requested in Celsius.
const UNITS: &str = "metric";

/// Client for the OpenWeatherMap current-weather and forecast endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
}

/// Typed view of the current-weather payload, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentWeather {
    /// City name as resolved by the provider
    pub city: String,
    /// ISO 3166 country code
    pub country: String,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Relative humidity percentage
    pub humidity_pct: f64,
    /// Short weather description (e.g. "scattered clouds")
    pub description: String,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    name: String,
    sys: OwmSys,
    main: OwmCurrentMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentMain {
    temp: f64,
    humidity: f64,
}

/// Forecast items only need the temperature.
#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    dt_txt: String,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

/// Error body OpenWeatherMap sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    message: Option<String>,
}

/// Upstream endpoint selector.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl OpenWeatherClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw current-weather JSON for a city.
    pub async fn fetch_current(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<serde_json::Value, AppError> {
        self.fetch(Endpoint::Current, city, api_key).await
    }

    /// Fetch the raw 5-day/3-hour forecast JSON for a city.
    pub async fn fetch_forecast(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<serde_json::Value, AppError> {
        self.fetch(Endpoint::Forecast, city, api_key).await
    }

    /// Fetch and parse current conditions for a city.
    pub async fn fetch_current_weather(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<CurrentWeather, AppError> {
        let raw = self.fetch_current(city, api_key).await?;
        parse_current_weather(&raw)
    }

    /// Fetch the forecast for a city and parse its `list` into entries.
    pub async fn fetch_forecast_list(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<Vec<ForecastEntry>, AppError> {
        let raw = self.fetch_forecast(city, api_key).await?;
        parse_forecast_entries(&raw)
    }

    /// One outbound GET. No retries.
    async fn fetch(
        &self,
        endpoint: Endpoint,
        city: &str,
        api_key: &str,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        tracing::debug!("Fetching OpenWeatherMap {} for '{}'", endpoint.path(), city);

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", UNITS)])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("OpenWeatherMap request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // The body usually carries a provider message like "city not found".
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Failed to read OpenWeatherMap error body: {}", e);
                    String::new()
                }
            };
            let message = serde_json::from_str::<OwmErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            tracing::warn!(
                "OpenWeatherMap {} for '{}' returned HTTP {}: {}",
                endpoint.path(),
                city,
                status,
                message
            );
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            AppError::Network(format!("OpenWeatherMap response read failed: {}", e))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::MalformedInput(format!("OpenWeatherMap JSON parse error: {}", e))
        })
    }
}

/// Extract the dashboard fields from a raw current-weather payload.
pub fn parse_current_weather(raw: &serde_json::Value) -> Result<CurrentWeather, AppError> {
    let current = OwmCurrentResponse::deserialize(raw).map_err(|e| {
        AppError::MalformedInput(format!("OpenWeatherMap current weather structure error: {}", e))
    })?;

    let description = first_description(&current.weather).ok_or_else(|| {
        AppError::MalformedInput("OpenWeatherMap current weather has no conditions".to_string())
    })?;

    Ok(CurrentWeather {
        city: current.name,
        country: current.sys.country,
        temp_c: current.main.temp,
        humidity_pct: current.main.humidity,
        description,
    })
}

/// Extract the `list` of a raw forecast payload as forecast entries, in order.
pub fn parse_forecast_entries(raw: &serde_json::Value) -> Result<Vec<ForecastEntry>, AppError> {
    let forecast = OwmForecastResponse::deserialize(raw).map_err(|e| {
        AppError::MalformedInput(format!("OpenWeatherMap forecast structure error: {}", e))
    })?;

    forecast
        .list
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let description = first_description(&item.weather).ok_or_else(|| {
                AppError::MalformedInput(format!(
                    "OpenWeatherMap forecast entry {} ('{}') has no conditions",
                    i, item.dt_txt
                ))
            })?;
            Ok(ForecastEntry {
                dt: item.dt,
                dt_txt: item.dt_txt,
                temp_c: item.main.temp,
                description,
            })
        })
        .collect()
}

fn first_description(conditions: &[OwmCondition]) -> Option<String> {
    conditions.first().map(|c| c.description.clone())
}

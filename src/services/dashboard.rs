//! Dashboard view: current conditions plus the grouped 5-day forecast for one city.

use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::grouping::{group_by_day, DayBucket, GroupedForecast};
use crate::services::openweather::{CurrentWeather, OpenWeatherClient};

/// One forecast sample as displayed inside a day section.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastItemView {
    /// Unix timestamp (seconds), unique per item
    pub dt: i64,
    /// Time of day, `HH:MM:SS`
    pub time: String,
    /// Temperature in Celsius
    pub temp_c: f64,
    pub description: String,
}

/// A day section of the forecast panel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastDayView {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub items: Vec<ForecastItemView>,
}

/// Everything the dashboard shows after a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub current: CurrentWeather,
    /// Up to five day sections, in date order of first appearance
    pub forecast_days: Vec<ForecastDayView>,
    /// Whether the provider returned more days than are shown
    pub truncated: bool,
}

impl From<&DayBucket> for ForecastDayView {
    fn from(day: &DayBucket) -> Self {
        Self {
            date: day.date.clone(),
            items: day
                .entries
                .iter()
                .map(|e| ForecastItemView {
                    dt: e.dt,
                    // Grouping has validated dt_txt, so the time part is present.
                    time: e.time_of_day().unwrap_or_default().to_string(),
                    temp_c: e.temp_c,
                    description: e.description.clone(),
                })
                .collect(),
        }
    }
}

impl DashboardView {
    pub fn new(current: CurrentWeather, grouped: &GroupedForecast) -> Self {
        Self {
            current,
            forecast_days: grouped.days.iter().map(ForecastDayView::from).collect(),
            truncated: grouped.truncated,
        }
    }
}

/// Run one city search: fetch current weather and forecast, group the forecast by day.
///
/// Both upstream calls run concurrently; the first failure fails the search.
pub async fn build_dashboard(
    client: &OpenWeatherClient,
    city: &str,
    api_key: &str,
) -> Result<DashboardView, AppError> {
    let (current, entries) = futures::future::try_join(
        client.fetch_current_weather(city, api_key),
        client.fetch_forecast_list(city, api_key),
    )
    .await?;

    let grouped = group_by_day(&entries)?;

    tracing::info!(
        "Dashboard for '{}' ({}, {}): {} forecast entries over {} days",
        city,
        current.city,
        current.country,
        entries.len(),
        grouped.days.len()
    );

    Ok(DashboardView::new(current, &grouped))
}

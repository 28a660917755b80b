//! Daily grouping of the 3-hourly forecast list.
//!
//! The provider returns a flat, chronological list of forecast samples. The
//! dashboard shows them one section per calendar date, limited to five days.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

/// Maximum number of distinct dates kept in a grouped forecast.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Timestamp layout of `dt_txt` in the provider's forecast list.
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GroupingError {
    #[error("Forecast entry {index} has a malformed timestamp: '{dt_txt}'")]
    MalformedTimestamp { index: usize, dt_txt: String },
}

/// One forecast sample from the provider's multi-day list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastEntry {
    /// Unix timestamp (seconds) of the sample
    pub dt: i64,
    /// Local date and time as text, `YYYY-MM-DD HH:MM:SS`
    pub dt_txt: String,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Short weather description (e.g. "light rain")
    pub description: String,
}

impl ForecastEntry {
    /// Date portion of `dt_txt` (before the first space), if present.
    pub fn date(&self) -> Option<&str> {
        self.dt_txt.split_once(' ').map(|(date, _)| date)
    }

    /// Time-of-day portion of `dt_txt` (after the first space), if present.
    pub fn time_of_day(&self) -> Option<&str> {
        self.dt_txt.split_once(' ').map(|(_, time)| time)
    }
}

/// All entries sharing one calendar date, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayBucket {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub entries: Vec<ForecastEntry>,
}

/// Forecast entries grouped by day, ordered by first appearance of each date.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GroupedForecast {
    /// At most five day buckets
    pub days: Vec<DayBucket>,
    /// Whether the input contained more distinct dates than were kept
    pub truncated: bool,
}

/// Group forecast entries by the date portion of their timestamp.
///
/// Entries for the same date are merged even when not contiguous in the input.
/// Buckets are ordered by the first appearance of their date and only the first
/// [`MAX_FORECAST_DAYS`] are kept. Every entry is validated, including those
/// whose date falls outside the retained window.
pub fn group_by_day(entries: &[ForecastEntry]) -> Result<GroupedForecast, GroupingError> {
    // Linear scan: a 5-day list holds at most ~6 distinct dates.
    let mut buckets: Vec<DayBucket> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let date = validated_date(index, entry)?;

        match buckets.iter_mut().find(|b| b.date == date) {
            Some(bucket) => bucket.entries.push(entry.clone()),
            None => buckets.push(DayBucket {
                date: date.to_string(),
                entries: vec![entry.clone()],
            }),
        }
    }

    let truncated = buckets.len() > MAX_FORECAST_DAYS;
    if truncated {
        tracing::debug!(
            "Forecast spans {} dates, keeping the first {}",
            buckets.len(),
            MAX_FORECAST_DAYS
        );
        buckets.truncate(MAX_FORECAST_DAYS);
    }

    Ok(GroupedForecast {
        days: buckets,
        truncated,
    })
}

fn validated_date(index: usize, entry: &ForecastEntry) -> Result<&str, GroupingError> {
    let malformed = || GroupingError::MalformedTimestamp {
        index,
        dt_txt: entry.dt_txt.clone(),
    };

    let date = entry.date().ok_or_else(malformed)?;
    NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT).map_err(|_| malformed())?;
    Ok(date)
}

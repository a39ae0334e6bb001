//! Shared types for the weather relay.
//!
//! The cache record is the only durable state. Forecast entries and
//! summaries are rebuilt from the raw provider payload on every run.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Coordinates the forecast is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation above mean sea level, in metres.
    #[serde(default)]
    pub msl: i64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {} {}m", self.latitude, self.longitude, self.msl)
    }
}

// ---------------------------------------------------------------------------
// Cache record
// ---------------------------------------------------------------------------

/// How far back `last_requested_at` is placed when a cache has none.
pub const UNKNOWN_REQUEST_AGE_HOURS: i64 = 100;

/// Per-location state persisted between fetcher invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub utc_offset: Option<String>,
    #[serde(default)]
    pub last_requested_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub last_processed_at: Option<DateTime<FixedOffset>>,
    /// Raw provider payload, stored as received.
    #[serde(default)]
    pub forecast: Option<serde_json::Value>,
    /// Fingerprint of the last emitted summary.
    #[serde(default)]
    pub sha1: Option<String>,
}

impl CacheRecord {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            utc_offset: None,
            last_requested_at: None,
            last_processed_at: None,
            forecast: None,
            sha1: None,
        }
    }

    /// Fill in `last_requested_at` so the backoff check always has a value.
    pub fn normalize(&mut self, now: DateTime<FixedOffset>) {
        if self.last_requested_at.is_none() {
            self.last_requested_at = Some(now - Duration::hours(UNKNOWN_REQUEST_AGE_HOURS));
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast entries
// ---------------------------------------------------------------------------

/// Interval length of a provider time node, read off its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Instantaneous values; the interval end is inferred.
    Point,
    Hourly,
    SixHourly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Point => write!(f, "point"),
            Granularity::Hourly => write!(f, "hourly"),
            Granularity::SixHourly => write!(f, "six_hourly"),
        }
    }
}

/// One normalized provider time node.
///
/// Fields the provider did not report stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
    pub granularity: Granularity,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Compass label such as "NW".
    pub wind_direction: Option<String>,
    pub precipitation: Option<f64>,
    pub sky_symbol: Option<String>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
}

impl ForecastEntry {
    /// An entry with only its interval set.
    pub fn bare(
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
        granularity: Granularity,
    ) -> Self {
        Self {
            from,
            to,
            granularity,
            temperature: None,
            wind_speed: None,
            wind_direction: None,
            precipitation: None,
            sky_symbol: None,
            min_temperature: None,
            max_temperature: None,
        }
    }

    /// Key correlating entries that cover the same interval.
    pub fn identity_key(&self) -> String {
        format!("{}:{}", self.from.timestamp(), self.to.timestamp())
    }
}

// ---------------------------------------------------------------------------
// Summary views
// ---------------------------------------------------------------------------

/// Per-entry series for the first 48 point entries. All vectors are aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyView {
    pub from_time: Vec<DateTime<FixedOffset>>,
    pub temperatures: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_direction: Vec<Option<String>>,
    pub precipitation: Vec<Option<f64>>,
}

/// Rolled-up values over a time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub precipitation: f64,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub max_wind_speed: Option<f64>,
}

/// The four views emitted by the fetcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub hourly: HourlyView,
    pub today: WindowSummary,
    pub three_days: WindowSummary,
    pub week: WindowSummary,
}

/// View names in the order they are forwarded.
pub const VIEW_NAMES: [&str; 4] = ["hourly", "today", "three_days", "week"];

/// What the fetcher writes to stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    #[serde(flatten)]
    pub summary: ForecastSummary,
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    #[error("Backoff of {0} minutes is out of range")]
    InvalidBackoff(i64),

    #[error("Provider error: HTTP {status}")]
    ProviderStatus { status: u16 },

    #[error("Malformed provider payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

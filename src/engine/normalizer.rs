//! Provider payload → flat list of [`ForecastEntry`].
//!
//! met.no reports a mix of instantaneous nodes (`from == to`) and interval
//! nodes spanning one or six hours. Interval nodes carry precipitation and
//! the sky symbol; instantaneous nodes carry temperature and wind.
//!
//! Instantaneous nodes get an inferred end time. The first one seen sets a
//! baseline attribute count; later ones with the same count are treated as
//! hourly, the rest as six-hourly. This mirrors how met.no thins out its
//! reporting further into the future and is specific to that provider.

use chrono::{DateTime, Duration, FixedOffset};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::RunContext;
use crate::types::{ForecastEntry, Granularity, WeatherError};

// ---------------------------------------------------------------------------
// Raw payload shape (only what we read)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawForecast {
    product: RawProduct,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    time: Vec<RawTimeNode>,
}

#[derive(Debug, Deserialize)]
struct RawTimeNode {
    from: String,
    to: String,
    /// Kept as a map: its key count drives end-time inference.
    #[serde(default)]
    location: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a raw payload into entries starting strictly after `ctx.now`,
/// ordered by start time and expressed in `ctx.offset`.
pub fn normalize(raw: &Value, ctx: &RunContext) -> Result<Vec<ForecastEntry>, WeatherError> {
    let parsed = RawForecast::deserialize(raw)
        .map_err(|e| WeatherError::MalformedPayload(e.to_string()))?;

    let mut baseline_count: Option<usize> = None;
    let mut entries = Vec::with_capacity(parsed.product.time.len());

    for node in &parsed.product.time {
        let (from, to) = match (parse_time(&node.from), parse_time(&node.to)) {
            (Some(from), Some(to)) => (from.with_timezone(&ctx.offset), to.with_timezone(&ctx.offset)),
            _ => {
                warn!(from = %node.from, to = %node.to, "Skipping time node with unparseable timestamps");
                continue;
            }
        };

        let granularity = classify(from, to);
        let mut entry = extract(&node.location, from, to, granularity);

        if granularity == Granularity::Point {
            let count = node.location.len();
            let baseline = *baseline_count.get_or_insert(count);
            let span = if count == baseline { Duration::hours(1) } else { Duration::hours(6) };
            entry.to = entry.from + span;
        }

        entries.push(entry);
    }

    let total = entries.len();
    entries.retain(|e| e.from > ctx.now);
    entries.sort_by_key(|e| e.from);

    debug!(
        total,
        upcoming = entries.len(),
        baseline_count = ?baseline_count,
        "Forecast normalized"
    );
    Ok(entries)
}

/// Granularity from the interval span alone.
pub fn classify(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Granularity {
    let span = to - from;
    if span == Duration::hours(1) {
        Granularity::Hourly
    } else if span == Duration::hours(6) {
        Granularity::SixHourly
    } else {
        Granularity::Point
    }
}

fn parse_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Pull the known fields out of a `location` node. Absent nodes stay `None`.
fn extract(
    location: &Map<String, Value>,
    from: DateTime<FixedOffset>,
    to: DateTime<FixedOffset>,
    granularity: Granularity,
) -> ForecastEntry {
    let number = |node: &str, field: &str| {
        location.get(node).map(|n| coerce_f64(n.get(field)))
    };
    let label = |node: &str, field: &str| {
        location.get(node).and_then(|n| n.get(field)).and_then(coerce_label)
    };

    ForecastEntry {
        from,
        to,
        granularity,
        temperature: number("temperature", "value"),
        wind_speed: number("windSpeed", "mps"),
        wind_direction: label("windDirection", "name"),
        precipitation: number("precipitation", "value"),
        sky_symbol: label("symbol", "id"),
        min_temperature: number("minTemperature", "value"),
        max_temperature: number("maxTemperature", "value"),
    }
}

/// met.no sends numbers as strings. Anything unreadable counts as 0.0.
fn coerce_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn coerce_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

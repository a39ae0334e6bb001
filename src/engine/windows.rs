//! Window aggregation over back-filled point entries.
//!
//! Every reduction drops absent values first. Empty input sums to 0.0 and
//! has no min or max.

use chrono::Duration;
use tracing::debug;

use crate::config::RunContext;
use crate::types::{ForecastEntry, ForecastSummary, HourlyView, WindowSummary};

/// Point entries shown in the hourly view.
pub const HOURLY_LIMIT: usize = 48;

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Roll up a set of entries.
pub fn rollup<'a, I>(entries: I) -> WindowSummary
where
    I: IntoIterator<Item = &'a ForecastEntry>,
{
    let mut summary = WindowSummary::default();
    for e in entries {
        summary.precipitation += e.precipitation.unwrap_or(0.0);
        summary.min_temperature = min_present(summary.min_temperature, e.temperature);
        summary.max_temperature = max_present(summary.max_temperature, e.temperature);
        summary.max_wind_speed = max_present(summary.max_wind_speed, e.wind_speed);
    }
    summary
}

/// Fold the carry-forward aggregate into a window aggregate.
pub fn combine(window: WindowSummary, carry: WindowSummary) -> WindowSummary {
    WindowSummary {
        precipitation: window.precipitation + carry.precipitation,
        min_temperature: min_present(window.min_temperature, carry.min_temperature),
        max_temperature: max_present(window.max_temperature, carry.max_temperature),
        max_wind_speed: max_present(window.max_wind_speed, carry.max_wind_speed),
    }
}

fn min_present(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

fn max_present(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Aligned per-entry series over the first [`HOURLY_LIMIT`] point entries.
pub fn hourly_view(points: &[ForecastEntry]) -> HourlyView {
    let first = &points[..points.len().min(HOURLY_LIMIT)];
    HourlyView {
        from_time: first.iter().map(|e| e.from).collect(),
        temperatures: first.iter().map(|e| e.temperature).collect(),
        wind_speed: first.iter().map(|e| e.wind_speed).collect(),
        wind_direction: first.iter().map(|e| e.wind_direction.clone()).collect(),
        precipitation: first.iter().map(|e| e.precipitation).collect(),
    }
}

/// Roll-up of the fine-grained tail before six-hourly coverage begins.
///
/// Covers point entries ending at or before the earliest six-hourly start.
/// Without six-hourly entries the tail is empty.
pub fn carry_forward(points: &[ForecastEntry], six_hourly: &[ForecastEntry]) -> WindowSummary {
    match six_hourly.iter().map(|e| e.from).min() {
        Some(horizon) => rollup(points.iter().filter(|e| e.to <= horizon)),
        None => WindowSummary::default(),
    }
}

/// Build all four views. `points` must already be back-filled and ordered.
pub fn summarize(
    points: &[ForecastEntry],
    six_hourly: &[ForecastEntry],
    ctx: &RunContext,
) -> ForecastSummary {
    let sod = ctx.start_of_day;
    let end_of_today = sod + Duration::hours(24);
    let three_day_end = sod + Duration::days(3);
    let week_end = sod + Duration::days(7);

    let today = rollup(points.iter().filter(|e| e.to <= end_of_today));
    let carry = carry_forward(points, six_hourly);

    let three_days = combine(
        rollup(points.iter().filter(|e| e.from < three_day_end)),
        carry,
    );
    let week = combine(rollup(points.iter().filter(|e| e.from < week_end)), carry);

    debug!(
        points = points.len(),
        six_hourly = six_hourly.len(),
        carry_precipitation = carry.precipitation,
        "Windows aggregated"
    );

    ForecastSummary {
        hourly: hourly_view(points),
        today,
        three_days,
        week,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

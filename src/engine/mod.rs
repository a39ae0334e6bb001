//! Forecast engine: refresh decision, normalization, back-fill and
//! window aggregation, tied together by the [`fetcher::Fetcher`] pipeline.

pub mod backfill;
pub mod fetcher;
pub mod normalizer;
pub mod refresh;
pub mod windows;

use anyhow::{Context, Result};
use sha1::{Digest, Sha1};

use crate::config::RunContext;
use crate::types::{ForecastSummary, WeatherError};

/// Raw provider payload → the four summary views.
pub fn build_summary(
    raw: &serde_json::Value,
    ctx: &RunContext,
) -> Result<ForecastSummary, WeatherError> {
    let entries = normalizer::normalize(raw, ctx)?;
    let mut parts = backfill::partition(entries);
    backfill::backfill(&mut parts.points, &parts.hourly, &parts.six_hourly);
    Ok(windows::summarize(&parts.points, &parts.six_hourly, ctx))
}

/// Hex SHA-1 of the serialized summary.
pub fn fingerprint(summary: &ForecastSummary) -> Result<String> {
    let json = serde_json::to_string(summary).context("Failed to serialise summary")?;
    Ok(hex::encode(Sha1::digest(json.as_bytes())))
}

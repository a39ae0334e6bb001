//! Refresh decision: should this run hit the provider?
//!
//! No cached forecast always fetches. Otherwise the provider's "next model
//! run" hint must have passed (or be unreadable), and the last request must
//! be older than the backoff window.

use chrono::{DateTime, Duration, FixedOffset};
use tracing::info;

use crate::types::CacheRecord;

/// The provider's announced time of its next model run, if readable.
pub fn next_model_run(forecast: &serde_json::Value) -> Option<DateTime<FixedOffset>> {
    let raw = forecast.pointer("/meta/model/nextrun")?.as_str()?;
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Decide whether to request a new forecast.
///
/// Expects a record that has been through [`CacheRecord::normalize`]; a
/// missing `last_requested_at` is treated as outside the backoff window.
pub fn should_fetch(record: &CacheRecord, now: DateTime<FixedOffset>, backoff: Duration) -> bool {
    let Some(forecast) = &record.forecast else {
        info!("No cached forecast. Will request new forecast.");
        return true;
    };

    let upstream_ready = match next_model_run(forecast) {
        None => {
            info!("Next run date unavailable. Will request new forecast.");
            true
        }
        Some(next_run) if next_run < now => {
            info!(next_run = %next_run, "Next run date has passed. Will request new forecast.");
            true
        }
        Some(next_run) => {
            info!(next_run = %next_run, "New forecast probably not available. Do not fetch.");
            false
        }
    };
    if !upstream_ready {
        return false;
    }

    // A window reaching past the representable range never expires.
    let outside_backoff = match (record.last_requested_at, now.checked_sub_signed(backoff)) {
        (None, _) => true,
        (Some(last), Some(cutoff)) => last < cutoff,
        (Some(_), None) => false,
    };
    if !outside_backoff {
        info!(
            last_requested_at = ?record.last_requested_at,
            backoff_minutes = backoff.num_minutes(),
            "In backoff window. Will not request new forecast."
        );
    }
    outside_backoff
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Persistence layer.
//!
//! One JSON cache file per location. The file is read once and written once
//! per fetcher run, with no locking: two runs for the same location at the
//! same time can overwrite each other.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::CacheRecord;

/// Save the cache record to a JSON file.
pub fn save_cache(record: &CacheRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string(record).context("Failed to serialise cache record")?;

    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write cache to {}", path.display()))?;

    debug!(path = %path.display(), bytes = json.len(), "Cache saved");
    Ok(())
}

/// Load the cache record from a JSON file.
/// Returns None if the file doesn't exist (first run for this location).
pub fn load_cache(path: &Path) -> Result<Option<CacheRecord>> {
    if !path.is_file() {
        info!(path = %path.display(), "Cache file not found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache from {}", path.display()))?;

    let record: CacheRecord = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse cache from {}", path.display()))?;

    info!(
        path = %path.display(),
        has_forecast = record.forecast.is_some(),
        last_requested_at = ?record.last_requested_at,
        "Cache loaded from disk"
    );

    Ok(Some(record))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

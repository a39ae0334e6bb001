//! Fetch pipeline: cache → refresh decision → provider → summary → cache.
//!
//! One run reads the cache once and writes it once. A provider failure is
//! logged and the previous payload (if any) is summarized instead.

use anyhow::Result;
use tracing::{info, warn};

use super::{build_summary, fingerprint, refresh};
use crate::config::RunContext;
use crate::provider::ForecastSource;
use crate::storage;
use crate::types::{CacheRecord, ForecastOutput, ForecastSummary};

pub struct Fetcher<S: ForecastSource> {
    source: S,
}

impl<S: ForecastSource> Fetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Run the pipeline once and return what should be printed.
    pub async fn run(&self, ctx: &RunContext) -> Result<ForecastOutput> {
        let mut record = self.load_record(ctx);
        record.location = ctx.location;
        record.utc_offset = Some(ctx.offset_label.clone());
        record.normalize(ctx.now);

        if refresh::should_fetch(&record, ctx.now, ctx.backoff) {
            record.last_requested_at = Some(ctx.now);
            match self.source.fetch_forecast(&ctx.location).await {
                Ok(payload) => record.forecast = Some(payload),
                Err(e) => warn!(
                    error = %e,
                    has_previous = record.forecast.is_some(),
                    "Forecast request failed, using cached forecast"
                ),
            }
        }

        let summary = match &record.forecast {
            Some(raw) => build_summary(raw, ctx).unwrap_or_else(|e| {
                warn!(error = %e, "Could not summarize cached forecast");
                ForecastSummary::default()
            }),
            None => {
                warn!("No forecast available, emitting empty summary");
                ForecastSummary::default()
            }
        };

        let sha1 = fingerprint(&summary)?;
        let changed = record.sha1.as_deref() != Some(sha1.as_str());
        record.last_processed_at = Some(ctx.now);
        record.sha1 = Some(sha1);

        storage::save_cache(&record, &ctx.cache_path)?;

        info!(
            changed,
            hourly_entries = summary.hourly.from_time.len(),
            today_precipitation = summary.today.precipitation,
            "Forecast processed"
        );

        Ok(ForecastOutput { summary, changed })
    }

    fn load_record(&self, ctx: &RunContext) -> CacheRecord {
        match storage::load_cache(&ctx.cache_path) {
            Ok(Some(record)) => record,
            Ok(None) => CacheRecord::new(ctx.location),
            Err(e) => {
                warn!(error = %e, "Cache unreadable, starting fresh");
                CacheRecord::new(ctx.location)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

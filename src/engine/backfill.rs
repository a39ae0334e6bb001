//! Precipitation back-fill.
//!
//! Point entries carry temperature and wind but no precipitation. The
//! hourly and six-hourly interval entries covering the same span carry it,
//! correlated through [`ForecastEntry::identity_key`].

use std::collections::HashMap;
use tracing::debug;

use crate::types::{ForecastEntry, Granularity};

/// Entries split by granularity, each list keeping input order.
#[derive(Debug, Default, Clone)]
pub struct Partitioned {
    pub points: Vec<ForecastEntry>,
    pub hourly: Vec<ForecastEntry>,
    pub six_hourly: Vec<ForecastEntry>,
}

pub fn partition(entries: Vec<ForecastEntry>) -> Partitioned {
    let mut out = Partitioned::default();
    for entry in entries {
        match entry.granularity {
            Granularity::Point => out.points.push(entry),
            Granularity::Hourly => out.hourly.push(entry),
            Granularity::SixHourly => out.six_hourly.push(entry),
        }
    }
    out
}

/// Give every point entry a precipitation value.
///
/// Lookup order: hourly entry with the same key, then six-hourly entry with
/// the same key, then 0.0. A six-hourly match also lends its sky symbol to a
/// point entry that has none.
pub fn backfill(points: &mut [ForecastEntry], hourly: &[ForecastEntry], six_hourly: &[ForecastEntry]) {
    let rain_hourly: HashMap<String, Option<f64>> = hourly
        .iter()
        .map(|e| (e.identity_key(), e.precipitation))
        .collect();
    let by_key_six: HashMap<String, &ForecastEntry> =
        six_hourly.iter().map(|e| (e.identity_key(), e)).collect();

    let mut from_hourly = 0usize;
    let mut from_six = 0usize;

    for point in points.iter_mut() {
        let key = point.identity_key();
        let six = by_key_six.get(&key);

        let precipitation = match rain_hourly.get(&key).copied().flatten() {
            Some(p) => {
                from_hourly += 1;
                p
            }
            None => match six.and_then(|e| e.precipitation) {
                Some(p) => {
                    from_six += 1;
                    p
                }
                None => 0.0,
            },
        };
        point.precipitation = Some(precipitation);

        if point.sky_symbol.is_none() {
            if let Some(symbol) = six.and_then(|e| e.sky_symbol.clone()) {
                point.sky_symbol = Some(symbol);
            }
        }
    }

    debug!(
        points = points.len(),
        from_hourly,
        from_six,
        "Precipitation back-filled"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

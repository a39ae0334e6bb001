//! Synthetic met.no payloads anchored to a fixed local day.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde_json::{json, Value};
use std::path::Path;

use weather_relay::config::RunContext;
use weather_relay::types::Location;

pub fn location() -> Location {
    Location { latitude: -33.95283, longitude: 18.48056, msl: 11 }
}

pub fn offset() -> FixedOffset {
    FixedOffset::east_opt(2 * 3600).unwrap()
}

/// 00:30 local (+02:00) on 2026-10-16.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 22, 30, 0).unwrap()
}

/// Local midnight of [`now`].
pub fn start_of_day() -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap()
}

pub fn ctx(dir: &Path, now: DateTime<Utc>) -> RunContext {
    RunContext::new(location(), offset(), now, 10, dir).unwrap()
}

fn at(hours: i64) -> String {
    (start_of_day() + Duration::hours(hours)).to_rfc3339()
}

/// Temperature of the n-th dense point (1-based): cycles 10.0..=15.0.
pub fn temperature(n: i64) -> f64 {
    10.0 + ((n - 1) % 6) as f64
}

fn dense_point(hours: i64) -> Value {
    json!({
        "from": at(hours), "to": at(hours),
        "location": {
            "id": "home", "altitude": "11", "latitude": "-33.9528", "longitude": "18.4806",
            "temperature": {"id": "TTT", "unit": "celsius", "value": format!("{:.1}", temperature(hours))},
            "windDirection": {"id": "dd", "deg": "200.0", "name": "SW"},
            "windSpeed": {"id": "ff", "mps": "5.0", "beaufort": "3", "name": "Lett bris"}
        }
    })
}

fn hourly_rain(hours: i64, mm: f64) -> Value {
    json!({
        "from": at(hours), "to": at(hours + 1),
        "location": {
            "id": "home", "altitude": "11", "latitude": "-33.9528", "longitude": "18.4806",
            "precipitation": {"unit": "mm", "value": format!("{mm:.1}")},
            "symbol": {"id": "Drizzle", "number": "46"}
        }
    })
}

/// 48 dense points starting 01:00 local, each with 0.5 mm in the matching
/// hourly node, then one sparse point covered by a six-hourly node.
pub fn forecast_payload(nextrun: &str) -> Value {
    let mut nodes = vec![dense_point(-1), hourly_rain(-1, 9.9)];
    for h in 1..=48 {
        nodes.push(dense_point(h));
        nodes.push(hourly_rain(h, 0.5));
    }
    nodes.push(json!({
        "from": at(49), "to": at(49),
        "location": {
            "temperature": {"value": "8.0"},
            "windSpeed": {"mps": "1.0"}
        }
    }));
    nodes.push(json!({
        "from": at(49), "to": at(55),
        "location": {
            "precipitation": {"value": "3.0"},
            "symbol": {"id": "Rain", "number": "9"},
            "minTemperature": {"value": "7.0"},
            "maxTemperature": {"value": "12.0"}
        }
    }));

    json!({
        "created": "2026-10-15T21:00:00Z",
        "meta": {"model": {"name": "met_public_forecast", "nextrun": nextrun}},
        "product": {"class": "pointData", "time": nodes}
    })
}

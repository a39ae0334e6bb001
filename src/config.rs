//! Command-line configuration and the per-run context.
//!
//! Both binaries parse their flags with `clap`. The fetcher folds its flags
//! into a [`RunContext`] that is passed explicitly through the engine, so no
//! module reads location, clock or offset from ambient state.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, Offset, TimeZone, Utc};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::types::{Location, WeatherError};

/// met.no locationforecast endpoint the original deployment polled.
pub const DEFAULT_PROVIDER_URL: &str =
    "https://api.met.no/weatherapi/locationforecast/1.9/.json";

/// Shown when parameters fail to parse.
pub const PARAMETER_HINT: &str = "Unable to parse parameters. --help for details.";

/// Shown by the forwarder when no usable target URL was given.
pub const TARGET_HINT: &str = "Please provide a target url to post to";

// ---------------------------------------------------------------------------
// Fetcher CLI
// ---------------------------------------------------------------------------

/// Fetch a cached met.no forecast and print windowed summaries as JSON.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weather-fetch",
    version,
    allow_negative_numbers = true,
    after_help = "Example: weather-fetch --latitude=-33.95283 --longitude=18.48056 --msl=11 --utc-offset=+0200"
)]
pub struct FetchArgs {
    /// Latitude in decimal degrees.
    #[arg(long)]
    pub latitude: f64,

    /// Longitude in decimal degrees.
    #[arg(long)]
    pub longitude: f64,

    /// Elevation above mean sea level, in metres.
    #[arg(long, default_value_t = 0)]
    pub msl: i64,

    /// Minutes to pause between requests to the provider.
    #[arg(short = 'b', long, default_value_t = 10)]
    pub backoff: i64,

    /// Timezone offset such as +0200 or -05:00. Defaults to the local system.
    #[arg(short = 'u', long, alias = "utc_offset")]
    pub utc_offset: Option<String>,

    /// Directory holding the per-location cache files.
    #[arg(long, env = "WEATHER_CACHE_DIR", default_value = "/tmp")]
    pub cache_dir: PathBuf,

    /// Forecast endpoint.
    #[arg(long, env = "WEATHER_PROVIDER_URL", default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,
}

impl FetchArgs {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            msl: self.msl,
        }
    }
}

// ---------------------------------------------------------------------------
// Forwarder CLI
// ---------------------------------------------------------------------------

/// Read fetcher output from stdin and POST each view to a target URL.
#[derive(Debug, Clone, Parser)]
#[command(name = "weather-forward", version)]
pub struct ForwardArgs {
    /// Base URL to post to. Must start with "http".
    pub url: Option<String>,

    /// Skip posting when the fetcher reported no change.
    #[arg(long)]
    pub skip_unchanged: bool,
}

impl ForwardArgs {
    /// The target URL, if one was given and looks like HTTP(S).
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| u.starts_with("http"))
    }
}

// ---------------------------------------------------------------------------
// Run context
// ---------------------------------------------------------------------------

/// Everything a single fetcher run needs to know about where and when it is.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub location: Location,
    /// Offset the output timestamps and day boundaries are expressed in.
    pub offset: FixedOffset,
    /// Original `--utc-offset` text, kept for the cache record.
    pub offset_label: String,
    pub now: DateTime<FixedOffset>,
    /// Local midnight at the start of `now`'s day.
    pub start_of_day: DateTime<FixedOffset>,
    pub backoff: Duration,
    pub cache_path: PathBuf,
}

impl RunContext {
    /// Build a context for an explicit instant. Tests use this directly.
    pub fn new(
        location: Location,
        offset: FixedOffset,
        now: DateTime<Utc>,
        backoff_minutes: i64,
        cache_dir: &Path,
    ) -> Result<Self, WeatherError> {
        let now = now.with_timezone(&offset);
        Ok(Self {
            location,
            offset,
            offset_label: format_offset(offset),
            now,
            start_of_day: start_of_day(now),
            backoff: backoff_window(backoff_minutes)?,
            cache_path: cache_file_path(cache_dir, &location),
        })
    }

    /// Build the context for a real run from parsed flags and the system clock.
    pub fn from_args(args: &FetchArgs) -> Result<Self, WeatherError> {
        let offset = match args.utc_offset.as_deref() {
            Some(raw) => parse_utc_offset(raw)?,
            None => Local::now().offset().fix(),
        };
        let mut ctx = Self::new(
            args.location(),
            offset,
            Utc::now(),
            args.backoff,
            &args.cache_dir,
        )?;
        if let Some(raw) = &args.utc_offset {
            ctx.offset_label = raw.clone();
        }
        Ok(ctx)
    }
}

/// Backoff window for a `--backoff` value in minutes.
pub fn backoff_window(minutes: i64) -> Result<Duration, WeatherError> {
    Duration::try_minutes(minutes).ok_or(WeatherError::InvalidBackoff(minutes))
}

/// Midnight of the given instant's calendar day, in the same offset.
pub fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    // Fixed offsets have no gaps, so this mapping is always single.
    now.offset()
        .from_local_datetime(&midnight)
        .single()
        .unwrap_or(now)
}

/// Cache file for a location: non-word characters in the identifier become `_`.
pub fn cache_file_path(cache_dir: &Path, location: &Location) -> PathBuf {
    let ident = format!(
        "yr_parser_{}_{}_{}",
        location.latitude, location.longitude, location.msl
    );
    let name: String = ident
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    cache_dir.join(name)
}

/// Parse offsets like `+0200`, `+02:00`, `+200`, `-5` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, WeatherError> {
    let invalid = || WeatherError::InvalidOffset(raw.to_string());
    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        Some(c) if c.is_ascii_digit() => (1, s),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        3 | 4 => {
            let split = digits.len() - 2;
            let h = digits[..split].parse::<i32>().map_err(|_| invalid())?;
            let m = digits[split..].parse::<i32>().map_err(|_| invalid())?;
            (h, m)
        }
        _ => return Err(invalid()),
    };
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn format_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{sign}{:02}{:02}", secs / 3600, (secs % 3600) / 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

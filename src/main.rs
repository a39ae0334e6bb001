//! weather-fetch — fetcher entry point.
//!
//! Parses flags, builds the run context, runs the cache → provider →
//! summary pipeline once and prints the result as one line of JSON.
//! Meant to be invoked repeatedly by an external scheduler.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};

use weather_relay::config::{FetchArgs, RunContext, PARAMETER_HINT};
use weather_relay::engine::fetcher::Fetcher;
use weather_relay::logging;
use weather_relay::provider::met_no::MetNoClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    logging::init_logging();

    let args = match FetchArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().context("Failed to print help")?;
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "Invalid parameters");
            eprintln!("{PARAMETER_HINT}");
            return Ok(());
        }
    };

    let ctx = match RunContext::from_args(&args) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "Invalid parameters");
            eprintln!("{PARAMETER_HINT}");
            return Ok(());
        }
    };

    info!(
        location = %ctx.location,
        utc_offset = %ctx.offset_label,
        backoff_minutes = args.backoff,
        "Will run"
    );
    info!(path = %ctx.cache_path.display(), "Cache file");

    let client = MetNoClient::new(Some(&args.provider_url))?;
    let output = Fetcher::new(client).run(&ctx).await?;

    let json = serde_json::to_string(&output).context("Failed to serialise forecast output")?;
    println!("{json}");

    Ok(())
}

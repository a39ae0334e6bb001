//! weather-forward — forwarder entry point.
//!
//! Reads one fetcher output from stdin and POSTs each view to the URL given
//! as the only positional argument.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use weather_relay::config::{ForwardArgs, TARGET_HINT};
use weather_relay::forward::{self, Forwarder};
use weather_relay::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    logging::init_logging();

    let args = match ForwardArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().context("Failed to print help")?;
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "Invalid parameters");
            eprintln!("{TARGET_HINT}");
            return Ok(());
        }
    };

    // No network activity without a usable target.
    let Some(target) = args.target() else {
        eprintln!("{TARGET_HINT}");
        return Ok(());
    };

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read stdin")?;

    let output = match forward::parse_output(&input) {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "Nothing to forward");
            return Ok(());
        }
    };

    if args.skip_unchanged && !forward::is_changed(&output) {
        info!("No change.");
        return Ok(());
    }

    let report = Forwarder::new(target)?.forward(&output).await;
    if !report.all_posted() {
        for failed in &report.failed {
            warn!(view = %failed.view, reason = %failed.reason, "View not delivered");
        }
    }

    Ok(())
}

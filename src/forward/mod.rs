//! Forwarder: relays each summary view to a downstream endpoint.
//!
//! One POST per view, in [`VIEW_NAMES`] order, tagged with
//! `source=weather_<view>`. A failed post is recorded and the remaining views
//! are still sent. There is no retry.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::types::{WeatherError, VIEW_NAMES};

// ---------------------------------------------------------------------------
// Forward result
// ---------------------------------------------------------------------------

/// Outcome of forwarding one fetcher output.
#[derive(Debug, Clone, Default)]
pub struct ForwardReport {
    pub posted: Vec<String>,
    pub failed: Vec<FailedPost>,
}

#[derive(Debug, Clone)]
pub struct FailedPost {
    pub view: String,
    pub reason: String,
}

impl ForwardReport {
    pub fn all_posted(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Forwarder
// ---------------------------------------------------------------------------

pub struct Forwarder {
    http: Client,
    target: String,
}

impl Forwarder {
    /// Create a forwarder for `target`, which must start with `http`.
    /// TLS is used when the scheme is `https`.
    pub fn new(target: &str) -> Result<Self> {
        if !target.starts_with("http") {
            return Err(WeatherError::InvalidTarget(target.to_string()).into());
        }
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client for forwarding")?;

        Ok(Self {
            http,
            target: target.to_string(),
        })
    }

    /// POST every view of a fetcher output, one at a time.
    pub async fn forward(&self, output: &Value) -> ForwardReport {
        info!(url = %self.target, "Will upload views");
        let mut report = ForwardReport::default();

        for name in VIEW_NAMES {
            let body = output.get(name).unwrap_or(&Value::Null);
            match self.post_view(name, body).await {
                Ok(()) => report.posted.push(name.to_string()),
                Err(e) => {
                    error!(view = name, error = %e, "Error uploading data");
                    report.failed.push(FailedPost {
                        view: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            posted = report.posted.len(),
            failed = report.failed.len(),
            "Forwarding complete"
        );
        report
    }

    async fn post_view(&self, name: &str, body: &Value) -> Result<()> {
        let source = format!("weather_{name}");
        let resp = self
            .http
            .post(&self.target)
            .query(&[("source", source.as_str())])
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {name} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Downstream returned HTTP {status} for {name}");
        }
        debug!(view = name, status = status.as_u16(), "View posted");
        Ok(())
    }
}

/// Parse the fetcher's stdout text.
pub fn parse_output(raw: &str) -> Result<Value> {
    serde_json::from_str(raw.trim()).context("Input is not valid fetcher JSON")
}

/// The `changed` flag of a fetcher output; missing counts as changed.
pub fn is_changed(output: &Value) -> bool {
    output.get("changed").and_then(Value::as_bool).unwrap_or(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

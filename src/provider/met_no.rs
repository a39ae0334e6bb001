//! met.no locationforecast client.
//!
//! API: `https://api.met.no/weatherapi/locationforecast/1.9/.json`
//! Auth: None, but a descriptive `User-Agent` is mandatory.
//! Query: `lat`, `lon`, `msl`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::ForecastSource;
use crate::config::DEFAULT_PROVIDER_URL;
use crate::types::{Location, WeatherError};

const USER_AGENT: &str = concat!("weather_relay/", env!("CARGO_PKG_VERSION"));

pub struct MetNoClient {
    http: Client,
    base_url: String,
}

impl MetNoClient {
    /// Create a client against `base_url`, or the public endpoint when `None`.
    ///
    /// No request timeout is set; the transport default applies.
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for met.no")?;

        Ok(Self {
            http,
            base_url: base_url.unwrap_or(DEFAULT_PROVIDER_URL).to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ForecastSource for MetNoClient {
    async fn fetch_forecast(&self, location: &Location) -> Result<serde_json::Value> {
        info!(url = %self.base_url, location = %location, "Requesting forecast from met.no");

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("msl", location.msl.to_string()),
            ])
            .send()
            .await
            .context("met.no request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::ProviderStatus { status: status.as_u16() }.into());
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse met.no response")?;

        debug!(status = status.as_u16(), "met.no forecast received");
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

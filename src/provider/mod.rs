//! Forecast providers.
//!
//! Defines the `ForecastSource` trait and the met.no implementation.

pub mod met_no;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Location;

/// Abstraction over the remote forecast provider.
///
/// Implementors return the provider's payload untouched; normalization
/// happens in the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Request a fresh forecast for a location.
    async fn fetch_forecast(&self, location: &Location) -> Result<serde_json::Value>;
}

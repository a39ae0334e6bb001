//! Mock forecast provider for integration testing.
//!
//! Serves a fixed payload (or a forced error) and counts requests, all
//! in-memory with no network.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use weather_relay::provider::ForecastSource;
use weather_relay::types::Location;

pub struct MockProvider {
    payload: Arc<Mutex<Value>>,
    calls: Arc<Mutex<Vec<Location>>>,
    /// If set, every request fails with this message.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Arc::new(Mutex::new(payload)),
            calls: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    /// A handle sharing this provider's state, for a second fetcher run.
    pub fn handle(&self) -> Self {
        Self {
            payload: Arc::clone(&self.payload),
            calls: Arc::clone(&self.calls),
            force_error: Arc::clone(&self.force_error),
        }
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn set_payload(&self, payload: Value) {
        *self.payload.lock().unwrap() = payload;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_location(&self) -> Option<Location> {
        self.calls.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl ForecastSource for MockProvider {
    async fn fetch_forecast(&self, location: &Location) -> Result<Value> {
        self.calls.lock().unwrap().push(*location);
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        Ok(self.payload.lock().unwrap().clone())
    }
}

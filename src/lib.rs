//! weather_relay — cached met.no forecasts rolled up into windowed summaries.
//!
//! Library crate exposing all modules for use by integration tests
//! and the two binary entry points.

pub mod config;
pub mod types;
pub mod storage;
pub mod provider;
pub mod engine;
pub mod forward;
pub mod logging;

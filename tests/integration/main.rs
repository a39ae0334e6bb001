//! Integration tests: fetcher pipeline end to end and fetcher → forwarder.

mod fixtures;
mod forwarding;
mod mock_provider;

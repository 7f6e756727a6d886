//! Live adapters that talk to the real provider and image hosts.

pub mod http_fetcher;
pub mod openai;

use std::time::Duration;

use reqwest::Client;

use crate::error::CardError;

/// Build a client, applying the timeout only when one is configured.
fn build_client(timeout: Option<Duration>) -> Result<Client, CardError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| CardError::Config(format!("Failed to create HTTP client: {e}")))
}

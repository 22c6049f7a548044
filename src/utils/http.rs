// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::FetchConfig;

/// Ceiling for requests that do not set their own timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create a configured asynchronous HTTP client.
///
/// Strategy-specific timeouts are applied per request; the client-level
/// timeout is only a backstop.
pub fn create_async_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

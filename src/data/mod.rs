pub mod cache;
pub mod fred;
pub mod loader;
pub mod models;
pub mod yahoo;

use std::time::Duration;

use crate::config;

/// HTTP client shared by all fetches
pub fn http_client() -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(config::USER_AGENT)
        .timeout(Duration::from_secs(config::HTTP_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

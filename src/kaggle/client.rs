use anyhow::{Context, Result};
use std::time::Duration;

/// Site root every profile URL hangs off.
pub const BASE_URL: &str = "https://www.kaggle.com";

const USER_AGENT: &str = concat!("kaggle-board/", env!("CARGO_PKG_VERSION"));

/// Create the shared HTTP client. One client serves the whole run; its
/// connection pool is the single browsing session the fetch loop reuses.
pub fn create_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")
}

/// Probe the site root once before any scoring starts.
///
/// An unreachable site is fatal here rather than recoverable per user:
/// degrading it to per-view fallbacks would report every student as a
/// clean zero when the acquisition layer never worked at all.
pub async fn preflight(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let response = client
        .get(base_url)
        .send()
        .await
        .with_context(|| format!("Could not reach {}", base_url))?;

    response
        .error_for_status()
        .with_context(|| format!("{} rejected the session probe", base_url))?;

    Ok(())
}

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use super::input::decode_protocol_bytes;

/// Configuration for downloading protocol texts
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent sent with each request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: concat!("protocol-parts/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Downloads protocol text from the transcript source
pub struct ProtocolFetcher {
    client: Client,
}

impl ProtocolFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch the protocol at `url` and decode it as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        info!("Fetching protocol from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request protocol from {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Protocol download failed: {} - {}", status, url);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read protocol response body")?;
        let text = decode_protocol_bytes(&bytes)
            .with_context(|| format!("Protocol at {} is not text", url))?;

        info!("Fetched {} bytes", bytes.len());
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.user_agent.starts_with("protocol-parts/"));
    }

    #[test]
    fn test_fetcher_builds() {
        assert!(ProtocolFetcher::new(&FetchConfig::default()).is_ok());
    }
}

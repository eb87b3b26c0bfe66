//! HTTP client for App Store listing pages using wreq for TLS fingerprint emulation.

use crate::appstore::storefront::StorefrontCode;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

const APP_STORE_BASE_URL: &str = "https://apps.apple.com";

/// Trait for fetching listing pages - enables mocking for tests.
#[async_trait]
pub trait StorefrontFetch: Send + Sync {
    /// Fetches the listing page for a storefront and returns its HTML.
    async fn fetch(&self, storefront: &StorefrontCode) -> Result<String>;
}

/// App Store HTTP client with browser impersonation.
pub struct AppStoreClient {
    client: Client,
    app_id: String,
    app_slug: String,
    base_url: Option<String>,
}

impl AppStoreClient {
    /// Creates a new client with the given configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None).await
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub async fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            app_id: config.app_id.trim().to_string(),
            app_slug: config.app_slug.trim().to_string(),
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or the App Store for production).
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(APP_STORE_BASE_URL)
    }

    /// Returns the listing URL for a storefront.
    pub fn listing_url(&self, storefront: &StorefrontCode) -> String {
        format!(
            "{}/{}/app/{}/id{}",
            self.base_url().trim_end_matches('/'),
            storefront,
            urlencoding::encode(&self.app_slug),
            self.app_id
        )
    }

    /// Performs a GET request with browser headers for the storefront's locale.
    async fn get(&self, url: &str, storefront: &StorefrontCode) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", storefront.accept_language())
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 429 || status == 503 {
            warn!("Rate limited ({}). Consider using a proxy or increasing --delay.", status);
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl StorefrontFetch for AppStoreClient {
    async fn fetch(&self, storefront: &StorefrontCode) -> Result<String> {
        let url = self.listing_url(storefront);

        info!("Fetching storefront: {}", storefront);
        self.get(&url, storefront).await
    }
}

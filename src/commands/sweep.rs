//! Storefront sweep: fetch every configured storefront and normalize its prices.

use crate::appstore::{extract_price_labels, AppStoreClient, StorefrontCode, StorefrontFetch};
use crate::config::Config;
use crate::pricing::{aggregate, fetch_failed, LocaleRules, StorefrontResult};
use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sweeps the configured storefronts one at a time.
pub struct SweepCommand {
    config: Config,
    rules: LocaleRules,
}

impl SweepCommand {
    /// Creates a new sweep command; locale rules are frozen here.
    pub fn new(config: Config) -> Self {
        let rules = LocaleRules::from_config(&config);
        Self { config, rules }
    }

    /// Runs the sweep against the App Store.
    pub async fn execute(&self) -> Result<Vec<StorefrontResult>> {
        self.config.validate()?;

        let client =
            AppStoreClient::new(&self.config).await.context("Failed to create HTTP client")?;

        Ok(self.execute_with_client(&client).await)
    }

    /// Runs the sweep with a provided client (for testing).
    ///
    /// A storefront that fails to fetch is recorded as an error result and
    /// the sweep moves on.
    pub async fn execute_with_client(&self, client: &impl StorefrontFetch) -> Vec<StorefrontResult> {
        let mut results = Vec::with_capacity(self.config.storefronts.len());

        for (i, storefront) in self.config.storefronts.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }

            let result = match client.fetch(storefront).await {
                Ok(html) => self.process_page(storefront, &html),
                Err(e) => {
                    warn!("Failed to fetch {}: {:#}", storefront, e);
                    fetch_failed(storefront, &self.rules)
                }
            };

            info!("{} done ({})", storefront, result.currency);
            results.push(result);
        }

        results
    }

    /// Turns one fetched listing page into a result.
    pub fn process_page(&self, storefront: &StorefrontCode, html: &str) -> StorefrontResult {
        let labels = extract_price_labels(html);
        for label in &labels {
            debug!(
                "{}: {} = {}",
                storefront,
                label.title.as_deref().unwrap_or("(untitled)"),
                label.price
            );
        }
        aggregate(storefront, &labels, &self.rules)
    }

    /// Waits between storefronts.
    async fn pause(&self) {
        if self.config.delay_ms == 0 && self.config.delay_jitter_ms == 0 {
            return;
        }

        let jitter = if self.config.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.config.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.config.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{PriceOutcome, PriceValue};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock fetcher serving canned pages per storefront.
    struct MockStorefrontClient {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl MockStorefrontClient {
        fn new(pages: &[(&str, String)]) -> Self {
            Self {
                pages: pages.iter().map(|(code, html)| (code.to_string(), html.clone())).collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StorefrontFetch for MockStorefrontClient {
        async fn fetch(&self, storefront: &StorefrontCode) -> Result<String> {
            self.requested.lock().unwrap().push(storefront.to_string());
            match self.pages.get(storefront.as_str()) {
                Some(html) => Ok(html.clone()),
                None => anyhow::bail!("Request failed with status: 404 Not Found"),
            }
        }
    }

    fn listing_html(prices: &[&str]) -> String {
        let items: String = prices
            .iter()
            .map(|price| {
                format!(
                    r#"<li class="list-with-numbers__item">
                        <span class="list-with-numbers__item__title">Tier</span>
                        <span class="list-with-numbers__item__price">{}</span>
                    </li>"#,
                    price
                )
            })
            .collect();
        format!("<html><body><ol>{}</ol></body></html>", items)
    }

    fn make_test_config(storefronts: &[&str]) -> Config {
        Config {
            storefronts: storefronts.iter().map(|s| s.parse().unwrap()).collect(),
            delay_ms: 0,
            delay_jitter_ms: 0,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_sweep_all_found() {
        let client = MockStorefrontClient::new(&[
            ("us", listing_html(&["$19.99", "$199.99", "$199.99"])),
            ("de", listing_html(&["22,99 €", "229,00 €", "229,99 €"])),
        ]);
        let cmd = SweepCommand::new(make_test_config(&["us", "de"]));

        let results = cmd.execute_with_client(&client).await;
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].country_code.as_str(), "us");
        assert_eq!(results[0].currency, "USD");
        assert_eq!(
            results[0].price_detail.detail().unwrap().plus_monthly,
            PriceValue::Decimal(19.99)
        );

        assert_eq!(results[1].country_code.as_str(), "de");
        assert_eq!(results[1].currency, "EUR");
        assert_eq!(results[1].price_detail.detail().unwrap().pro_monthly, PriceValue::Decimal(229.0));
    }

    #[tokio::test]
    async fn test_sweep_continues_after_fetch_failure() {
        let client = MockStorefrontClient::new(&[
            ("us", listing_html(&["$19.99", "$199.99", "$199.99"])),
            ("jp", listing_html(&["¥3,000", "¥30,000", "¥30,000"])),
        ]);
        let cmd = SweepCommand::new(make_test_config(&["us", "kr", "jp"]));

        let results = cmd.execute_with_client(&client).await;
        assert_eq!(results.len(), 3);

        assert_eq!(results[1].country_code.as_str(), "kr");
        assert_eq!(results[1].currency, "KRW");
        assert_eq!(results[1].price_detail, PriceOutcome::Error);

        assert!(results[2].is_found());
        assert_eq!(results[2].price_detail.detail().unwrap().plus_monthly, PriceValue::Whole(3000));

        let requested = client.requested.lock().unwrap().clone();
        assert_eq!(requested, vec!["us", "kr", "jp"]);
    }

    #[tokio::test]
    async fn test_sweep_shortfall_not_found() {
        let client =
            MockStorefrontClient::new(&[("gb", listing_html(&["£18.99", "£189.99"]))]);
        let cmd = SweepCommand::new(make_test_config(&["gb"]));

        let results = cmd.execute_with_client(&client).await;
        assert_eq!(results[0].price_detail, PriceOutcome::NotFound);
        assert_eq!(results[0].currency, "GBP");
    }

    #[tokio::test]
    async fn test_sweep_empty_page_not_found() {
        let client = MockStorefrontClient::new(&[("ca", "<html></html>".to_string())]);
        let cmd = SweepCommand::new(make_test_config(&["ca"]));

        let results = cmd.execute_with_client(&client).await;
        assert_eq!(results[0].price_detail, PriceOutcome::NotFound);
        assert_eq!(results[0].currency, "CAD");
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_config() {
        let mut config = make_test_config(&["us"]);
        config.app_id = String::new();
        let cmd = SweepCommand::new(config);

        let err = cmd.execute().await.unwrap_err().to_string();
        assert!(err.contains("Invalid app id"));
    }

    #[test]
    fn test_process_page_uses_configured_currency() {
        let mut config = make_test_config(&["ch"]);
        config.currencies.insert("ch".to_string(), "CHF".to_string());
        let cmd = SweepCommand::new(config);

        let html = listing_html(&["CHF 20.00", "CHF 200.00", "CHF 200.00"]);
        let result = cmd.process_page(&"ch".parse().unwrap(), &html);
        assert_eq!(result.currency, "CHF");
        assert!(result.is_found());

        let result = cmd.process_page(&"ch".parse().unwrap(), "<html></html>");
        assert_eq!(result.currency, "CHF");
    }

    #[test]
    fn test_pause_skipped_without_delay() {
        let cmd = SweepCommand::new(make_test_config(&["us"]));
        tokio_test::block_on(cmd.pause());
    }
}

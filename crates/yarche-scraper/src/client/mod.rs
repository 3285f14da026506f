//! Page fetching for rendered storefront HTML.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use yarche_core::AppConfig;

use crate::error::ScraperError;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Source of rendered storefront pages.
///
/// Implementations own one session: pages are fetched one at a time and the
/// selected delivery address applies to every later fetch.
pub trait PageFetcher {
    /// Returns the HTML of `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;

    /// Switches the session to the store serving `address`.
    fn select_location(
        &mut self,
        address: &str,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Whether [`select_location`](Self::select_location) changes what later
    /// fetches return. When `false`, every store sees the same pages.
    fn applies_location(&self) -> bool {
        true
    }
}

/// [`PageFetcher`] over plain HTTP with retry on transient failures.
///
/// The storefront renders `window.__INITIAL_STATE__` server-side, so a GET
/// carries everything the scraper reads. Choosing a delivery address is a UI
/// interaction owned by the browser session; this fetcher only records the
/// address and reports it in its logs.
pub struct HttpPageFetcher {
    client: Client,
    policy: RetryPolicy,
    location: Option<String>,
}

impl HttpPageFetcher {
    /// Creates a fetcher with the given timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        policy: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            policy,
            location: None,
        })
    }

    /// # Errors
    ///
    /// See [`HttpPageFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            RetryPolicy::from_config(config),
        )
    }

    /// The most recently selected delivery address.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "ru-RU,ru;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let html = retry_with_backoff(&self.policy, url, || self.fetch_once(url)).await?;
        tracing::debug!(
            url,
            location = self.location.as_deref().unwrap_or_default(),
            bytes = html.len(),
            "page loaded"
        );
        Ok(html)
    }

    async fn select_location(&mut self, address: &str) -> Result<(), ScraperError> {
        tracing::info!(address, "delivery address selected");
        self.location = Some(address.to_string());
        Ok(())
    }

    fn applies_location(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

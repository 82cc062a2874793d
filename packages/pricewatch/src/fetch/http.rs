//! HTTP-based page fetcher.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::fetch::PageFetcher;

/// Browser identity presented to target sites.
///
/// Retail sites serve degraded or challenge pages to obvious bots, so
/// the fetcher identifies as a current desktop browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Path fragments that mark an anti-bot redirect.
///
/// Landing on one of these instead of the requested page means the
/// site refused the scrape; the adapter treats it as an empty result.
const CHALLENGE_MARKERS: &[&str] = &["captcha", "punish", "challenge", "verify", "robot"];

/// Fetches pages over HTTP with a realistic browser identity.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    settle: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a fetcher with default settings (45 s timeout).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(45))
                .build()
                .unwrap_or_default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settle: Duration::from_millis(1200),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Set the settle delay applied before lazy-load re-renders.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn is_challenge(final_url: &reqwest::Url) -> bool {
        let path = final_url.path().to_lowercase();
        CHALLENGE_MARKERS.iter().any(|m| path.contains(m))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(url = %url, "fetch timed out");
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    warn!(url = %url, error = %e, "HTTP request failed");
                    FetchError::Http(Box::new(e))
                }
            })?;

        // An anti-bot wall usually shows up as a redirect to a
        // challenge page, not as an error status.
        if Self::is_challenge(response.url()) {
            warn!(url = %url, landed = %response.url(), "anti-bot challenge detected");
            return Err(FetchError::BotChallenge {
                url: url.to_string(),
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP {}", status),
            ))));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))
    }

    async fn fetch_lazy(&self, url: &str, step: usize) -> FetchResult<String> {
        debug!(url = %url, step = step, "lazy-load re-render");
        tokio::time::sleep(self.settle).await;
        self.fetch(url).await
    }
}

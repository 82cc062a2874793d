//! Rate-limited fetcher wrapper.
//!
//! Wraps any PageFetcher with rate limiting using the governor crate,
//! keeping request rates against target retail sites polite.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::FetchResult;
use crate::fetch::PageFetcher;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A fetcher wrapper that enforces rate limits.
pub struct RateLimitedFetcher<F: PageFetcher> {
    inner: F,
    limiter: Arc<DefaultRateLimiter>,
}

impl<F: PageFetcher> RateLimitedFetcher<F> {
    /// Create a new rate-limited fetcher.
    ///
    /// # Arguments
    /// * `fetcher` - The underlying fetcher to wrap
    /// * `requests_per_second` - Maximum requests per second
    pub fn new(fetcher: F, requests_per_second: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).expect("requests_per_second must be > 0"),
        );
        Self {
            inner: fetcher,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create with burst support.
    pub fn with_burst(fetcher: F, requests_per_second: u32, burst: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).expect("requests_per_second must be > 0"),
        )
        .allow_burst(NonZeroU32::new(burst).expect("burst must be > 0"));

        Self {
            inner: fetcher,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    async fn wait_for_permit(&self) {
        self.limiter.until_ready().await;
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RateLimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.wait_for_permit().await;
        self.inner.fetch(url).await
    }

    async fn fetch_lazy(&self, url: &str, step: usize) -> FetchResult<String> {
        self.wait_for_permit().await;
        self.inner.fetch_lazy(url, step).await
    }
}

/// Extension trait for easy rate limiting.
pub trait FetcherExt: PageFetcher + Sized {
    /// Wrap this fetcher with rate limiting.
    fn rate_limited(self, requests_per_second: u32) -> RateLimitedFetcher<Self> {
        RateLimitedFetcher::new(self, requests_per_second)
    }

    /// Wrap with rate limiting and burst support.
    fn rate_limited_with_burst(
        self,
        requests_per_second: u32,
        burst: u32,
    ) -> RateLimitedFetcher<Self> {
        RateLimitedFetcher::with_burst(self, requests_per_second, burst)
    }
}

impl<F: PageFetcher + Sized> FetcherExt for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use std::time::Instant;

    #[tokio::test]
    async fn test_rate_limiting_spaces_requests() {
        let mock = MockFetcher::new()
            .with_page("https://example.com/1", "<html>1</html>")
            .with_page("https://example.com/2", "<html>2</html>")
            .with_page("https://example.com/3", "<html>3</html>");

        let fetcher = mock.rate_limited(2);

        let start = Instant::now();
        for url in [
            "https://example.com/1",
            "https://example.com/2",
            "https://example.com/3",
        ] {
            fetcher.fetch(url).await.unwrap();
        }
        let elapsed = start.elapsed();

        // First request is immediate; the next two wait at 2/sec.
        assert!(
            elapsed.as_millis() >= 500,
            "Rate limiting not working: {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_extension_trait() {
        let _fetcher = MockFetcher::new().rate_limited(1);
    }
}

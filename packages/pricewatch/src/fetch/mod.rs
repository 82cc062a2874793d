//! Page fetching abstraction.
//!
//! The scraping pipeline never talks to the network directly; it goes
//! through [`PageFetcher`]. A fetcher is acquired per adapter
//! invocation (or per detail-page fetch) and each call is an isolated
//! request; nothing is reused across invocations.
//!
//! [`PageFetcher::fetch_lazy`] is the lazy-load hook: when no product
//! cards resolve on the initial document, adapters ask for bounded
//! re-renders. The HTTP implementation re-requests after a settle
//! delay; a browser-backed implementation would scroll instead.

pub mod http;
pub mod rate_limited;

pub use http::HttpFetcher;
pub use rate_limited::{FetcherExt, RateLimitedFetcher};

use async_trait::async_trait;

use crate::error::FetchResult;

/// Fetches rendered page documents.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the document for a URL.
    async fn fetch(&self, url: &str) -> FetchResult<String>;

    /// Re-render after lazy-load trigger `step` (1-based).
    ///
    /// Called when the initial document had no product cards; each step
    /// corresponds to one bounded scroll/settle cycle.
    async fn fetch_lazy(&self, url: &str, step: usize) -> FetchResult<String> {
        let _ = step;
        self.fetch(url).await
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        (**self).fetch(url).await
    }

    async fn fetch_lazy(&self, url: &str, step: usize) -> FetchResult<String> {
        (**self).fetch_lazy(url, step).await
    }
}

//! Test doubles and fixtures.
//!
//! Hand-written mocks keep test behavior explicit: pages and scripted
//! completions go in, call logs come out. Shared by unit tests across
//! the crate.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ai::TextGenerator;
use crate::error::{FetchError, FetchResult, PipelineError, Result};
use crate::fetch::PageFetcher;
use crate::types::listing::Listing;

/// In-memory page fetcher with scripted responses.
///
/// `fetch` serves from the page map; `fetch_lazy` serves from the
/// lazy map keyed by (url, step) and falls back to the page map, so a
/// page that "renders" only after a given scroll step is expressed as
/// an empty base page plus one lazy entry.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    lazy_pages: HashMap<(String, usize), String>,
    challenges: Vec<String>,
    timeouts: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Serve `html` for `url` at a specific lazy-load step.
    pub fn with_lazy_page(
        mut self,
        url: impl Into<String>,
        step: usize,
        html: impl Into<String>,
    ) -> Self {
        self.lazy_pages.insert((url.into(), step), html.into());
        self
    }

    /// Answer `url` with an anti-bot challenge error.
    pub fn with_challenge(mut self, url: impl Into<String>) -> Self {
        self.challenges.push(url.into());
        self
    }

    /// Answer `url` with a timeout error.
    pub fn with_timeout(mut self, url: impl Into<String>) -> Self {
        self.timeouts.push(url.into());
        self
    }

    /// URLs requested so far, in order (lazy fetches included).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }

    fn scripted_failure(&self, url: &str) -> Option<FetchError> {
        if self.challenges.iter().any(|u| u == url) {
            return Some(FetchError::BotChallenge {
                url: url.to_string(),
            });
        }
        if self.timeouts.iter().any(|u| u == url) {
            return Some(FetchError::Timeout {
                url: url.to_string(),
            });
        }
        None
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.record(url);
        if let Some(err) = self.scripted_failure(url) {
            return Err(err);
        }
        self.pages.get(url).cloned().ok_or_else(|| {
            FetchError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no mock page for {}", url),
            )))
        })
    }

    async fn fetch_lazy(&self, url: &str, step: usize) -> FetchResult<String> {
        self.record(url);
        if let Some(err) = self.scripted_failure(url) {
            return Err(err);
        }
        if let Some(html) = self.lazy_pages.get(&(url.to_string(), step)) {
            return Ok(html.clone());
        }
        self.fetch(url).await
    }
}

/// Scripted text generator.
///
/// Responses are consumed in order; once the script runs out (or
/// `failing` was set) every call errors, which is how tests drive the
/// deterministic fallbacks.
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<Vec<String>>,
    failing: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one scripted response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Make every call fail.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.failing {
            return Err(PipelineError::Assistant(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "scripted failure",
            ))));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(PipelineError::Assistant(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "script exhausted",
            ))));
        }
        Ok(responses.remove(0))
    }
}

/// Listing fixture with a threshold, for alert and comparison tests.
pub fn listing(name: &str, price: &str, url: &str, threshold: &str) -> Listing {
    Listing::new(name, price, url)
        .with_threshold(threshold)
        .with_brand("")
        .with_source("Daraz")
}

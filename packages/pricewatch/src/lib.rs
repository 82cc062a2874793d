//! Multi-Source Product Price Tracking Library
//!
//! Scrapes product listings from a fixed set of retail sites, evaluates
//! them against per-listing price thresholds, ranks similar products,
//! and builds side-by-side comparisons with an optional
//! text-generation collaborator.
//!
//! # Design Philosophy
//!
//! **"Degrade, never fail"**
//!
//! - Extraction misses become sentinel values, not errors
//! - A dead site contributes an empty list; the run continues
//! - Every collaborator call carries a deterministic offline fallback
//! - Site differences are data (selector profiles), not code
//!
//! # Usage
//!
//! ```rust,ignore
//! use pricewatch::{Aggregator, HttpFetcher, JsonFileStore};
//! use pricewatch::types::config::Category;
//!
//! let fetcher = HttpFetcher::new();
//! let store = JsonFileStore::new("./data");
//! let aggregator = Aggregator::new(&fetcher, &store);
//!
//! // Scrape all sources and persist the merged collection.
//! let outcome = aggregator.run(Category::Phones, "Samsung", None).await?;
//!
//! // Evaluate thresholds over the stored listings.
//! let alerts = pricewatch::check_prices(outcome.listings());
//! ```
//!
//! # Modules
//!
//! - [`adapters`] - Per-site extraction profiles and the generic engine
//! - [`fetch`] - Page fetching (HTTP, rate limiting)
//! - [`aggregate`] - Multi-source orchestration and persistence
//! - [`alerts`] - Threshold evaluation
//! - [`recommend`] - TF-IDF similarity ranking
//! - [`compare`] - Feature matrix, best pick, deep enrichment
//! - [`store`] - Listing persistence (JSON files, in-memory)
//! - [`ai`] - Text-generation collaborator seam
//! - [`testing`] - Mock implementations for testing

pub mod adapters;
pub mod aggregate;
pub mod alerts;
pub mod compare;
pub mod error;
pub mod fetch;
pub mod price;
pub mod prompts;
pub mod recommend;
pub mod store;
pub mod testing;
pub mod types;

pub mod ai;

// Re-export core types at crate root
pub use error::{FetchError, PipelineError};
pub use types::{
    alert::Alert,
    comparison::{
        Analysis, BestPick, Comparison, ComparisonRow, DeepComparison, FeatureMatrix, PickSource,
        ProductDetails, SpecValue,
    },
    config::{Category, ScrapeConfig, StoreLayout},
    listing::{Listing, NO_NAME, NO_PRICE, NO_URL},
    recommendation::Recommendation,
};

// Re-export pipeline entry points
pub use aggregate::{Aggregator, ScrapeOutcome};
pub use alerts::{check_prices, filter_below_threshold, summarize_alerts};
pub use compare::{compare, deep_compare, extract_specs, scrape_details, select_by_urls};
pub use price::parse_price;
pub use recommend::recommend;

// Re-export fetchers and stores
pub use fetch::{FetcherExt, HttpFetcher, PageFetcher, RateLimitedFetcher};
pub use store::{JsonFileStore, ListingStore, MemoryStore};

// Re-export the collaborator seam
pub use ai::TextGenerator;

#[cfg(feature = "gemini")]
pub use ai::GeminiGenerator;

// Re-export testing utilities
pub use testing::{MockFetcher, MockGenerator};

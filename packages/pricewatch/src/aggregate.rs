//! Multi-source aggregation: run every site adapter for a query and
//! persist the merged collection.

use tracing::{info, warn};

use crate::adapters::{scrape_site, ScrapeRequest, SiteProfile};
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::store::ListingStore;
use crate::types::config::{Category, ScrapeConfig};
use crate::types::listing::Listing;

/// Result of one aggregation run.
///
/// An all-empty run is a recoverable condition, not an error: the
/// empty collection is persisted (superseding stale data) and the
/// caller is told nothing was found.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// At least one listing was collected and persisted.
    Scraped(Vec<Listing>),

    /// Every source came back empty; the empty collection was persisted.
    Nothing,
}

impl ScrapeOutcome {
    /// The collected listings, empty for [`ScrapeOutcome::Nothing`].
    pub fn listings(&self) -> &[Listing] {
        match self {
            ScrapeOutcome::Scraped(listings) => listings,
            ScrapeOutcome::Nothing => &[],
        }
    }
}

/// Runs the configured site adapters in sequence and persists the
/// merged result as the category's new collection.
pub struct Aggregator<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a dyn ListingStore,
    profiles: Vec<SiteProfile>,
    config: ScrapeConfig,
}

impl<'a> Aggregator<'a> {
    /// Aggregate over the built-in source set.
    pub fn new(fetcher: &'a dyn PageFetcher, store: &'a dyn ListingStore) -> Self {
        Self {
            fetcher,
            store,
            profiles: crate::adapters::default_profiles(),
            config: ScrapeConfig::default(),
        }
    }

    /// Use a custom source set.
    pub fn with_profiles(mut self, profiles: Vec<SiteProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Use custom scrape bounds.
    pub fn with_config(mut self, config: ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    /// Scrape every source for a query, persist the merged collection
    /// and return it.
    ///
    /// Sources run in sequence and are isolated: a source that fails or
    /// finds nothing contributes an empty list and the run continues.
    /// Results are concatenated in source order; a listing present on
    /// two sites stays duplicated, the comparison step needs both
    /// occurrences.
    pub async fn run(
        &self,
        category: Category,
        query: &str,
        threshold: Option<&str>,
    ) -> Result<ScrapeOutcome> {
        let threshold = threshold.unwrap_or(&self.config.default_threshold);
        let request = ScrapeRequest {
            query,
            threshold,
            category,
        };

        let mut merged: Vec<Listing> = Vec::new();
        for profile in &self.profiles {
            let listings = scrape_site(self.fetcher, profile, &request, &self.config).await;
            info!(
                source = profile.source,
                query,
                count = listings.len(),
                "source finished"
            );
            merged.extend(listings);
        }

        // Persist even when empty so stale listings never linger.
        self.store.replace(category, &merged).await?;

        if merged.is_empty() {
            warn!(category = %category, query, "no listings found on any source");
            return Ok(ScrapeOutcome::Nothing);
        }
        info!(category = %category, query, total = merged.len(), "aggregation complete");
        Ok(ScrapeOutcome::Scraped(merged))
    }

    /// Scrape every brand facet of a category in turn, merging all
    /// results into one persisted collection.
    pub async fn run_brands(
        &self,
        category: Category,
        brands: &[&str],
        threshold: Option<&str>,
    ) -> Result<ScrapeOutcome> {
        let threshold = threshold.unwrap_or(&self.config.default_threshold);

        let mut merged: Vec<Listing> = Vec::new();
        for brand in brands {
            let request = ScrapeRequest {
                query: brand,
                threshold,
                category,
            };
            for profile in &self.profiles {
                let listings = scrape_site(self.fetcher, profile, &request, &self.config).await;
                merged.extend(listings);
            }
        }

        self.store.replace(category, &merged).await?;

        if merged.is_empty() {
            warn!(category = %category, "no listings found for any brand");
            return Ok(ScrapeOutcome::Nothing);
        }
        info!(category = %category, total = merged.len(), "brand sweep complete");
        Ok(ScrapeOutcome::Scraped(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{DARAZ, SINGER};
    use crate::store::{ListingStore, MemoryStore};
    use crate::testing::MockFetcher;

    fn daraz_card(name: &str, href: &str, price: &str) -> String {
        format!(
            "<div data-qa-locator='product-item'>\
               <a data-qa-locator='product-name' href='{href}'>{name}</a>\
               <span data-qa-locator='product-price'>{price}</span>\
             </div>"
        )
    }

    #[tokio::test]
    async fn test_failed_source_does_not_block_others() {
        let fetcher = MockFetcher::new()
            .with_challenge(DARAZ.search_url("Samsung"))
            .with_page(
                SINGER.search_url("Samsung"),
                "<div class='product-item'>\
                   <a href='/products/s24'>Samsung Galaxy S24</a>\
                   <span class='price'>Rs. 300,000</span>\
                 </div>",
            );
        let store = MemoryStore::new();

        let aggregator =
            Aggregator::new(&fetcher, &store).with_profiles(vec![DARAZ.clone(), SINGER.clone()]);
        let outcome = aggregator
            .run(Category::Phones, "Samsung", None)
            .await
            .unwrap();

        let listings = outcome.listings();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source, "Singer");
    }

    #[tokio::test]
    async fn test_results_concatenate_in_source_order() {
        let fetcher = MockFetcher::new()
            .with_page(
                DARAZ.search_url("Samsung"),
                daraz_card("Galaxy S24", "/p/1", "Rs. 300,000"),
            )
            .with_page(
                SINGER.search_url("Samsung"),
                "<div class='product-item'>\
                   <a href='/products/s24'>Galaxy S24</a>\
                   <span class='price'>Rs. 310,000</span>\
                 </div>",
            );
        let store = MemoryStore::new();

        let aggregator =
            Aggregator::new(&fetcher, &store).with_profiles(vec![DARAZ.clone(), SINGER.clone()]);
        let outcome = aggregator
            .run(Category::Phones, "Samsung", None)
            .await
            .unwrap();

        // Same product on two sites stays duplicated across sources.
        let sources: Vec<_> = outcome.listings().iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, ["Daraz", "Singer"]);
    }

    #[tokio::test]
    async fn test_all_empty_persists_empty_and_reports_nothing() {
        let fetcher = MockFetcher::new()
            .with_challenge(DARAZ.search_url("Samsung"))
            .with_challenge(SINGER.search_url("Samsung"));
        let store = MemoryStore::new();

        // Seed stale data that the empty run must supersede.
        store
            .replace(
                Category::Phones,
                &[crate::testing::listing("Old", "Rs. 1", "https://x/old", "Rs. 2")],
            )
            .await
            .unwrap();

        let aggregator =
            Aggregator::new(&fetcher, &store).with_profiles(vec![DARAZ.clone(), SINGER.clone()]);
        let outcome = aggregator
            .run(Category::Phones, "Samsung", None)
            .await
            .unwrap();

        assert_eq!(outcome, ScrapeOutcome::Nothing);
        assert!(store.load(Category::Phones).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_threshold_applied() {
        let fetcher = MockFetcher::new().with_page(
            DARAZ.search_url("Samsung"),
            daraz_card("Galaxy S24", "/p/1", "Rs. 300,000"),
        );
        let store = MemoryStore::new();

        let aggregator = Aggregator::new(&fetcher, &store).with_profiles(vec![DARAZ.clone()]);
        let outcome = aggregator
            .run(Category::Phones, "Samsung", None)
            .await
            .unwrap();

        assert_eq!(outcome.listings()[0].threshold, "Rs. 400000");
    }
}

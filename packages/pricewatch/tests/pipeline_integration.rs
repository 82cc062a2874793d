//! Integration tests for the full price tracking workflow.
//!
//! These tests verify the end-to-end pipeline:
//! 1. Scrape all sources for a query
//! 2. Persist the merged collection
//! 3. Evaluate thresholds over the stored listings
//! 4. Rank recommendations and build a comparison

use pricewatch::{
    adapters::{DARAZ, MYSOFTLOGIC, SINGER},
    check_prices, compare, recommend, select_by_urls, summarize_alerts,
    testing::MockFetcher,
    types::config::Category,
    Aggregator, ListingStore, MemoryStore, PickSource, ScrapeOutcome,
};

fn daraz_card(name: &str, href: &str, price: &str) -> String {
    format!(
        "<div data-qa-locator='product-item'>\
           <a data-qa-locator='product-name' href='{href}'>{name}</a>\
           <span data-qa-locator='product-price'>{price}</span>\
         </div>"
    )
}

fn singer_card(name: &str, href: &str, price: &str) -> String {
    format!(
        "<div class='product-item'>\
           <a href='{href}'>{name}</a>\
           <span class='price'>{price}</span>\
         </div>"
    )
}

/// Helper to build a fetcher serving two healthy sources and one that
/// hits an anti-bot wall.
fn mixed_fetcher(query: &str) -> MockFetcher {
    MockFetcher::new()
        .with_page(
            DARAZ.search_url(query),
            format!(
                "{}{}",
                daraz_card("Samsung Galaxy S24 8GB RAM", "/p/s24", "Rs. 300,000"),
                daraz_card("Samsung Galaxy A55 6GB RAM", "/p/a55", "Rs. 120,000"),
            ),
        )
        .with_page(
            SINGER.search_url(query),
            singer_card(
                "Samsung Galaxy S24 Ultra 12GB RAM",
                "/products/s24-ultra",
                "Rs. 450,000",
            ),
        )
        .with_challenge(MYSOFTLOGIC.search_url(query))
}

#[tokio::test]
async fn test_scrape_evaluate_and_summarize() {
    let fetcher = mixed_fetcher("Samsung");
    let store = MemoryStore::new();
    let aggregator = Aggregator::new(&fetcher, &store)
        .with_profiles(vec![DARAZ.clone(), MYSOFTLOGIC.clone(), SINGER.clone()]);

    let outcome = aggregator
        .run(Category::Phones, "Samsung", Some("Rs. 400000"))
        .await
        .unwrap();

    // Two healthy sources contribute; the walled source contributes nothing.
    let listings = outcome.listings();
    assert_eq!(listings.len(), 3);
    assert!(listings.iter().all(|l| l.threshold == "Rs. 400000"));

    // Store holds exactly the scraped collection.
    let stored = store.load(Category::Phones).await.unwrap();
    assert_eq!(stored, listings);

    // The two below-threshold listings alert, in input order.
    let alerts = check_prices(&stored);
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].savings, 100_000);
    assert_eq!(alerts[1].savings, 280_000);

    // Offline summary covers the whole alert set.
    let summary = summarize_alerts(None, &alerts).await;
    assert!(summary.contains("2 product(s)"));
    assert!(summary.contains("380000"));
}

#[tokio::test]
async fn test_recommend_and_compare_over_stored_collection() {
    let fetcher = mixed_fetcher("Samsung");
    let store = MemoryStore::new();
    let aggregator = Aggregator::new(&fetcher, &store)
        .with_profiles(vec![DARAZ.clone(), MYSOFTLOGIC.clone(), SINGER.clone()]);
    aggregator
        .run(Category::Phones, "Samsung", None)
        .await
        .unwrap();

    let stored = store.load(Category::Phones).await.unwrap();

    // Budget keeps the two cheaper phones only.
    let recs = recommend("Samsung Galaxy S24", &stored, Some(350_000), 5);
    assert_eq!(recs.len(), 2);
    assert!(recs[0].name.contains("S24"));

    // Compare by URL selection, offline best pick.
    let selected = select_by_urls(
        &stored,
        &[
            "https://www.daraz.lk/p/s24",
            "https://www.daraz.lk/p/a55",
        ],
    );
    assert_eq!(selected.len(), 2);

    let result = compare(None, &selected, Category::Phones, &["price"]).await;
    assert_eq!(result.best.via, PickSource::Heuristic);
    assert!(result.best.name.contains("A55"));
    assert!(result.best.rationale.contains("lowest price"));
}

#[tokio::test]
async fn test_all_sources_walled_reports_nothing() {
    let query = "Samsung";
    let fetcher = MockFetcher::new()
        .with_challenge(DARAZ.search_url(query))
        .with_challenge(SINGER.search_url(query));
    let store = MemoryStore::new();
    let aggregator =
        Aggregator::new(&fetcher, &store).with_profiles(vec![DARAZ.clone(), SINGER.clone()]);

    let outcome = aggregator.run(Category::Phones, query, None).await.unwrap();

    assert_eq!(outcome, ScrapeOutcome::Nothing);
    assert!(store.load(Category::Phones).await.unwrap().is_empty());
}

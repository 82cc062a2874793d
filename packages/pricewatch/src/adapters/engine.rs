//! Generic selector-fallback scrape engine.
//!
//! One engine executes the extraction loop for any [`SiteProfile`]:
//! resolve product cards through the ordered fallback selector list,
//! retry through bounded lazy-load re-renders when nothing resolves,
//! extract name+link and price per card (each through its own fallback
//! list), normalize URLs, filter, dedup, and follow "next page"
//! controls up to a bounded page count.
//!
//! Failure semantics: a miss on any card field becomes a sentinel and
//! the loop continues; a page-level failure (timeout, anti-bot
//! challenge) ends the run with whatever was collected so far, an
//! empty list when it was the first page. Nothing here returns an
//! error to the caller.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::adapters::filters::{is_off_topic, BrandMatcher};
use crate::adapters::sites::SiteProfile;
use crate::fetch::PageFetcher;
use crate::types::config::{Category, ScrapeConfig};
use crate::types::listing::{normalize_url, Listing, NO_NAME, NO_PRICE, NO_URL};

/// One scrape invocation: query term plus session context.
#[derive(Debug, Clone)]
pub struct ScrapeRequest<'a> {
    /// Brand or free-text query term.
    pub query: &'a str,

    /// Threshold string stamped onto every produced listing.
    pub threshold: &'a str,

    /// Category the run belongs to (drives the keyword filter).
    pub category: Category,
}

/// Raw per-card extraction before normalization.
struct RawCard {
    name: String,
    href: String,
    price: String,
}

/// Scrape one site for a query, returning at most
/// `config.max_per_site` listings. Never fails; a dead site yields an
/// empty list.
pub async fn scrape_site(
    fetcher: &dyn PageFetcher,
    profile: &SiteProfile,
    request: &ScrapeRequest<'_>,
    config: &ScrapeConfig,
) -> Vec<Listing> {
    let brand_matcher = config
        .brand_filter
        .then(|| BrandMatcher::for_query(request.query));

    let mut listings: Vec<Listing> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page_url = profile.search_url(request.query);

    for page_index in 0..config.max_pages.max(1) {
        let html = match fetcher.fetch(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(source = profile.source, url = %page_url, error = %e, "page fetch failed");
                break;
            }
        };

        let (mut cards, mut next) = parse_listing_page(&html, profile);

        // Lazy-loading sites render cards only after scrolling; retry
        // through bounded re-renders before giving up on the page.
        if cards.is_empty() && page_index == 0 {
            for step in 1..=config.scroll_steps {
                match fetcher.fetch_lazy(&page_url, step).await {
                    Ok(html) => {
                        let (retry_cards, retry_next) = parse_listing_page(&html, profile);
                        if !retry_cards.is_empty() {
                            debug!(source = profile.source, step, "cards resolved after lazy load");
                            cards = retry_cards;
                            next = retry_next;
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(source = profile.source, step, error = %e, "lazy-load retry failed");
                        break;
                    }
                }
            }
        }

        debug!(
            source = profile.source,
            page = page_index + 1,
            cards = cards.len(),
            "parsed listing page"
        );

        for card in cards {
            let name = if card.name.is_empty() {
                NO_NAME.to_string()
            } else {
                card.name
            };
            let url = normalize_url(&card.href, profile.base);
            let price = if card.price.is_empty() {
                NO_PRICE.to_string()
            } else {
                card.price
            };

            if !profile.keep_sentinel_cards && (name == NO_NAME || url == NO_URL) {
                continue;
            }
            if let Some(matcher) = &brand_matcher {
                if name != NO_NAME && !matcher.matches(&name) {
                    continue;
                }
            }
            if config.category_filter && is_off_topic(request.category, &name) {
                continue;
            }
            // Dedup by URL within the run; sentinel links carry no
            // identity and pass through.
            if url != NO_URL && !seen.insert(url.clone()) {
                continue;
            }

            listings.push(
                Listing::new(name, price, url)
                    .with_threshold(request.threshold)
                    .with_brand(request.query)
                    .with_source(profile.source),
            );

            if listings.len() >= config.max_per_site {
                info!(
                    source = profile.source,
                    count = listings.len(),
                    "item cap reached"
                );
                return listings;
            }
        }

        match next {
            Some(next_href) if listings.len() < config.max_per_site => {
                page_url = normalize_url(&next_href, profile.base);
            }
            _ => break,
        }
    }

    info!(
        source = profile.source,
        query = request.query,
        count = listings.len(),
        "scrape finished"
    );
    listings
}

/// Parse one listing page: resolve cards through the fallback selector
/// list and extract raw fields per card.
///
/// Synchronous on purpose: the parsed document never crosses an await
/// point.
fn parse_listing_page(html: &str, profile: &SiteProfile) -> (Vec<RawCard>, Option<String>) {
    let document = Html::parse_document(html);

    let cards = select_first_matching(&document, profile.card_selectors);

    let raw: Vec<RawCard> = cards
        .into_iter()
        .map(|card| extract_card(card, profile))
        .collect();

    let next = select_first_matching(&document, profile.next_page_selectors)
        .first()
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.to_string());

    (raw, next)
}

/// Try each selector in order; the first that parses and yields any
/// matches wins. Invalid selectors are skipped, not fatal; that is
/// the point of carrying fallbacks.
fn select_first_matching<'a>(
    document: &'a Html,
    selectors: &[&str],
) -> Vec<ElementRef<'a>> {
    for raw_selector in selectors {
        let Ok(selector) = Selector::parse(raw_selector) else {
            continue;
        };
        let matches: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

/// Same fallback resolution, scoped to one card element.
fn select_first_within<'a>(card: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for raw_selector in selectors {
        let Ok(selector) = Selector::parse(raw_selector) else {
            continue;
        };
        if let Some(el) = card.select(&selector).next() {
            return Some(el);
        }
    }
    None
}

/// Extract raw name, link, and price from one card. Misses become
/// empty strings; the engine converts them to sentinels.
fn extract_card(card: ElementRef<'_>, profile: &SiteProfile) -> RawCard {
    let name_el = select_first_within(card, profile.name_selectors);

    let name = name_el.map(element_text).unwrap_or_default();
    let href = name_el
        .and_then(|el| el.value().attr("href"))
        .unwrap_or("")
        .to_string();

    let price = select_first_within(card, profile.price_selectors)
        .map(element_text)
        .unwrap_or_default();

    RawCard { name, href, price }
}

/// Visible text of an element, whitespace-normalized.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

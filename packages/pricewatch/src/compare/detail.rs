//! Deep comparison: per-listing detail-page scraping plus an expanded
//! narrative analysis.
//!
//! Detail pages are richer than search cards (ratings, seller,
//! warranty, full spec tables) but also flakier, so every listing is
//! scraped independently with a small retry budget and partial failure
//! only lowers the reported success ratio.

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ai::TextGenerator;
use crate::fetch::PageFetcher;
use crate::prompts::format_deep_analysis;
use crate::types::comparison::{
    Analysis, AnalysisSections, ComparisonRow, DeepComparison, ProductDetails, Review,
};
use crate::types::config::Category;
use crate::types::listing::Listing;

/// Retries per detail page before giving up on it.
const MAX_RETRIES: usize = 3;

/// Delay between detail-page retries.
const RETRY_DELAY: Duration = Duration::from_millis(500);

const NAME_SELECTORS: &[&str] = &[
    "h1.pdp-mod-product-badge-title",
    "h1.product-title",
    ".product-name",
    "h1",
];
const PRICE_SELECTORS: &[&str] = &[".pdp-price", "span.price", ".product-price", ".price"];
const ORIGINAL_PRICE_SELECTORS: &[&str] = &[".pdp-price_type_deleted", ".old-price", "del"];
const RATING_SELECTORS: &[&str] = &[".score-average", ".rating-value", ".rating"];
const REVIEW_COUNT_SELECTORS: &[&str] = &[".pdp-review-summary__link", ".review-count", ".count"];
const SPEC_ROW_SELECTORS: &[&str] = &[".specification-keys li", "table.specs tr", "table tr"];
const FEATURE_SELECTORS: &[&str] = &[
    ".pdp-product-highlights li",
    ".key-features li",
    "ul.features li",
];
const IMAGE_SELECTORS: &[&str] = &[".product-gallery img", ".pdp-block img", "img.gallery-image"];
const AVAILABILITY_SELECTORS: &[&str] = &[".stock-status", ".quantity-content-default", ".availability"];
const SELLER_SELECTORS: &[&str] = &[".seller-name__detail-name", ".seller-name"];
const WARRANTY_SELECTORS: &[&str] = &[".warranty__option-item", ".warranty"];
const SHIPPING_SELECTORS: &[&str] = &[".delivery-option-item__title", ".shipping-info"];
const DESCRIPTION_SELECTORS: &[&str] = &[
    ".detail-content",
    ".html-content",
    ".product-description",
    "#description",
];
const REVIEW_SELECTORS: &[&str] = &[".review-item", ".item-content"];

/// Scrape the detail page of every listing, in input order.
///
/// Listings without a real URL yield an unpopulated entry immediately;
/// fetch failures are retried [`MAX_RETRIES`] times before the entry
/// is left unpopulated.
pub async fn scrape_details(
    fetcher: &dyn PageFetcher,
    listings: &[Listing],
) -> Vec<ProductDetails> {
    let mut details = Vec::with_capacity(listings.len());
    for listing in listings {
        if !listing.has_url() {
            details.push(ProductDetails {
                url: listing.url.clone(),
                ..ProductDetails::default()
            });
            continue;
        }
        details.push(scrape_one(fetcher, listing).await);
    }
    details
}

async fn scrape_one(fetcher: &dyn PageFetcher, listing: &Listing) -> ProductDetails {
    for attempt in 1..=MAX_RETRIES {
        match fetcher.fetch(&listing.url).await {
            Ok(html) => {
                let mut details = parse_detail_page(&html, &listing.url);
                // The card already knows the name and price; keep them
                // when the detail page yields nothing better.
                if details.name.is_empty() && listing.has_name() {
                    details.name = listing.name.clone();
                }
                if details.price.is_empty() {
                    details.price = listing.price.clone();
                }
                debug!(url = %listing.url, populated = details.is_populated(), "detail scrape done");
                return details;
            }
            Err(e) => {
                warn!(url = %listing.url, attempt, error = %e, "detail fetch failed");
                if attempt < MAX_RETRIES {
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
    ProductDetails {
        url: listing.url.clone(),
        ..ProductDetails::default()
    }
}

/// Extract [`ProductDetails`] from a detail page. Every field is
/// best-effort through its own fallback selector list.
fn parse_detail_page(html: &str, url: &str) -> ProductDetails {
    let document = Html::parse_document(html);

    let mut details = ProductDetails {
        url: url.to_string(),
        name: first_text(&document, NAME_SELECTORS).unwrap_or_default(),
        price: first_text(&document, PRICE_SELECTORS).unwrap_or_default(),
        original_price: first_text(&document, ORIGINAL_PRICE_SELECTORS).unwrap_or_default(),
        rating: first_text(&document, RATING_SELECTORS).and_then(|t| leading_number(&t)),
        review_count: first_text(&document, REVIEW_COUNT_SELECTORS)
            .and_then(|t| leading_number(&t).map(|n| n as u32)),
        availability: first_text(&document, AVAILABILITY_SELECTORS).unwrap_or_default(),
        seller: first_text(&document, SELLER_SELECTORS).unwrap_or_default(),
        warranty: first_text(&document, WARRANTY_SELECTORS).unwrap_or_default(),
        shipping: first_text(&document, SHIPPING_SELECTORS).unwrap_or_default(),
        description: first_text(&document, DESCRIPTION_SELECTORS).unwrap_or_default(),
        ..ProductDetails::default()
    };

    for row in select_all(&document, SPEC_ROW_SELECTORS) {
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        match cells.as_slice() {
            [key, value, ..] => {
                details.specifications.insert(key.clone(), value.clone());
            }
            [only] => {
                // "Key: value" single-cell rows.
                if let Some((key, value)) = only.split_once(':') {
                    details
                        .specifications
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    details.features = select_all(&document, FEATURE_SELECTORS)
        .into_iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();

    details.images = select_all(&document, IMAGE_SELECTORS)
        .into_iter()
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_string)
        .collect();

    details.reviews = select_all(&document, REVIEW_SELECTORS)
        .into_iter()
        .map(|el| Review {
            rating: None,
            text: element_text(el),
        })
        .filter(|r| !r.text.is_empty())
        .take(10)
        .collect();

    details
}

/// Deep comparison: scrape details, run the expanded analysis and the
/// best-pick call, each with the deterministic fallback.
pub async fn deep_compare(
    ai: Option<&dyn TextGenerator>,
    fetcher: &dyn PageFetcher,
    listings: &[Listing],
    category: Category,
    priorities: &[&str],
) -> DeepComparison {
    let details = scrape_details(fetcher, listings).await;

    let populated = details.iter().filter(|d| d.is_populated()).count();
    let success_ratio = if details.is_empty() {
        0.0
    } else {
        populated as f32 / details.len() as f32
    };
    info!(
        listings = listings.len(),
        populated, success_ratio, "detail enrichment finished"
    );

    let rows: Vec<ComparisonRow> = listings
        .iter()
        .map(|l| ComparisonRow {
            name: l.name.clone(),
            price: l.price.clone(),
            brand: l.brand.clone(),
            source: l.source.clone(),
            url: l.url.clone(),
            specs: super::extract_specs(&l.name, category),
        })
        .collect();

    let analysis = build_analysis(ai, &details, &rows, priorities).await;
    let best = super::pick_best(ai, &rows, priorities).await;

    DeepComparison {
        details,
        analysis,
        best,
        success_ratio,
    }
}

async fn build_analysis(
    ai: Option<&dyn TextGenerator>,
    details: &[ProductDetails],
    rows: &[ComparisonRow],
    priorities: &[&str],
) -> Analysis {
    if let Some(ai) = ai {
        let blocks = render_detail_blocks(details, rows);
        match ai
            .generate(&format_deep_analysis(&blocks, &priorities.join(", ")))
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                return Analysis {
                    sections: parse_sections(&text),
                    full_text: text,
                };
            }
            Ok(_) => warn!("assistant returned an empty analysis, using fallback"),
            Err(e) => warn!(error = %e, "assistant analysis failed, using fallback"),
        }
    }
    fallback_analysis(rows, priorities)
}

/// Render scraped details as prompt text, one block per product.
fn render_detail_blocks(details: &[ProductDetails], rows: &[ComparisonRow]) -> String {
    details
        .iter()
        .zip(rows)
        .map(|(d, row)| {
            let mut lines = vec![format!("Product: {}", row.name)];
            lines.push(format!("Price: {}", row.price));
            if !d.original_price.is_empty() {
                lines.push(format!("Original price: {}", d.original_price));
            }
            if let Some(rating) = d.rating {
                lines.push(format!("Rating: {}", rating));
            }
            if let Some(count) = d.review_count {
                lines.push(format!("Reviews: {}", count));
            }
            if !d.seller.is_empty() {
                lines.push(format!("Seller: {}", d.seller));
            }
            if !d.warranty.is_empty() {
                lines.push(format!("Warranty: {}", d.warranty));
            }
            if !d.shipping.is_empty() {
                lines.push(format!("Shipping: {}", d.shipping));
            }
            for (key, value) in &d.specifications {
                lines.push(format!("{}: {}", key, value));
            }
            if !d.features.is_empty() {
                lines.push(format!("Features: {}", d.features.join("; ")));
            }
            for review in d.reviews.iter().take(3) {
                lines.push(format!("Customer review: {}", review.text));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Deterministic analysis when no collaborator is available: a factual
/// summary plus the heuristic verdict.
fn fallback_analysis(rows: &[ComparisonRow], priorities: &[&str]) -> Analysis {
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    let pick = super::heuristic_pick(rows, priorities);
    let priority = priorities.join(", ");

    let sections = AnalysisSections {
        executive_summary: format!(
            "Compared {} product(s) with priority '{}': {}.",
            rows.len(),
            priority,
            names.join(", ")
        ),
        detailed_comparison: rows
            .iter()
            .map(|r| format!("{} at {}", r.name, r.price))
            .collect::<Vec<_>>()
            .join("; "),
        priority_alignment: format!("Ranked offline by {} only.", priority),
        recommendations: pick.name.clone(),
        final_verdict: format!("{} - {}", pick.name, pick.rationale),
        ..AnalysisSections::default()
    };

    Analysis {
        full_text: format!(
            "{}\n{}",
            sections.executive_summary, sections.final_verdict
        ),
        sections,
    }
}

/// Split the collaborator's numbered-section answer into fields.
///
/// Headers are matched loosely ("1. EXECUTIVE SUMMARY", "EXECUTIVE
/// SUMMARY:", etc.); text before the first header is ignored and
/// unmatched sections stay empty.
fn parse_sections(text: &str) -> AnalysisSections {
    const HEADERS: &[&str] = &[
        "EXECUTIVE SUMMARY",
        "DETAILED COMPARISON",
        "STRENGTHS AND WEAKNESSES",
        "PRIORITY ALIGNMENT",
        "RECOMMENDATIONS",
        "BUYING ADVICE",
        "FINAL VERDICT",
    ];

    let mut bodies: Vec<Vec<&str>> = vec![Vec::new(); HEADERS.len()];
    let mut current: Option<usize> = None;

    for line in text.lines() {
        let upper = line.to_uppercase();
        if let Some(index) = HEADERS.iter().position(|h| upper.contains(h)) {
            current = Some(index);
            continue;
        }
        if let Some(index) = current {
            bodies[index].push(line);
        }
    }

    let body = |index: usize| bodies[index].join("\n").trim().to_string();
    AnalysisSections {
        executive_summary: body(0),
        detailed_comparison: body(1),
        strengths_weaknesses: body(2),
        priority_alignment: body(3),
        recommendations: body(4),
        buying_advice: body(5),
        final_verdict: body(6),
    }
}

fn select_all<'a>(document: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        let matches: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    select_all(document, selectors)
        .first()
        .map(|el| element_text(*el))
        .filter(|t| !t.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leading decimal number of a text like "4.7 out of 5" or "(123)".
fn leading_number(text: &str) -> Option<f32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{listing, MockFetcher, MockGenerator};

    const DETAIL_PAGE: &str = r#"<html><body>
        <h1 class="pdp-mod-product-badge-title">Samsung Galaxy S24 Ultra</h1>
        <span class="pdp-price">Rs. 350,000</span>
        <del>Rs. 400,000</del>
        <span class="score-average">4.7</span>
        <table class="specs">
            <tr><td>RAM</td><td>12 GB</td></tr>
            <tr><td>Storage</td><td>256 GB</td></tr>
        </table>
        <ul class="key-features"><li>Titanium frame</li><li>S Pen</li></ul>
        <div class="seller-name__detail-name">Samsung Official</div>
    </body></html>"#;

    #[tokio::test]
    async fn test_detail_page_extraction() {
        let fetcher = MockFetcher::new().with_page("https://x/1", DETAIL_PAGE);
        let listings = vec![listing("Galaxy S24 Ultra", "Rs. 350,000", "https://x/1", "")];

        let details = scrape_details(&fetcher, &listings).await;
        let d = &details[0];
        assert_eq!(d.name, "Samsung Galaxy S24 Ultra");
        assert_eq!(d.price, "Rs. 350,000");
        assert_eq!(d.original_price, "Rs. 400,000");
        assert_eq!(d.rating, Some(4.7));
        assert_eq!(d.specifications["RAM"], "12 GB");
        assert_eq!(d.features, ["Titanium frame", "S Pen"]);
        assert_eq!(d.seller, "Samsung Official");
        assert!(d.is_populated());
    }

    #[tokio::test]
    async fn test_partial_failure_lowers_ratio_only() {
        let fetcher = MockFetcher::new()
            .with_page("https://x/1", DETAIL_PAGE)
            .with_challenge("https://x/2");
        let listings = vec![
            listing("Galaxy S24 Ultra", "Rs. 350,000", "https://x/1", ""),
            listing("Galaxy A55", "Rs. 120,000", "https://x/2", ""),
        ];

        let result = deep_compare(
            None,
            &fetcher,
            &listings,
            crate::types::config::Category::Phones,
            &["price"],
        )
        .await;

        assert_eq!(result.details.len(), 2);
        assert!(result.details[0].is_populated());
        assert!(!result.details[1].is_populated());
        assert!((result.success_ratio - 0.5).abs() < 1e-6);
        // Fallback verdict still produced.
        assert!(!result.analysis.sections.final_verdict.is_empty());
    }

    #[tokio::test]
    async fn test_sentinel_url_skipped_without_fetch() {
        let fetcher = MockFetcher::new();
        let listings = vec![listing("No link item", "Rs. 1,000", "#", "")];

        let details = scrape_details(&fetcher, &listings).await;
        assert!(!details[0].is_populated());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_sections_parsed_from_assistant() {
        let fetcher = MockFetcher::new().with_page("https://x/1", DETAIL_PAGE);
        let listings = vec![listing("Galaxy S24 Ultra", "Rs. 350,000", "https://x/1", "")];
        let ai = MockGenerator::new()
            .with_response(
                "1. EXECUTIVE SUMMARY\nOne strong option.\n\
                 2. DETAILED COMPARISON\nOnly one product.\n\
                 7. FINAL VERDICT\nBuy it.",
            )
            .with_response("BEST OPTION: Galaxy S24 Ultra\nREASON: Only candidate.");

        let result = deep_compare(
            Some(&ai),
            &fetcher,
            &listings,
            crate::types::config::Category::Phones,
            &["price"],
        )
        .await;

        assert_eq!(result.analysis.sections.executive_summary, "One strong option.");
        assert_eq!(result.analysis.sections.final_verdict, "Buy it.");
        assert!(result.analysis.sections.buying_advice.is_empty());
        assert_eq!(result.best.rationale, "Only candidate.");
    }

    #[tokio::test]
    async fn test_scraped_extras_reach_analysis_prompt() {
        let page = r#"<html><body>
            <h1 class="product-title">Galaxy S24 Ultra</h1>
            <span class="price">Rs. 350,000</span>
            <del>Rs. 400,000</del>
            <div class="shipping-info">Free islandwide delivery</div>
            <div class="review-item">Great battery life</div>
            <div class="review-item">Camera is superb</div>
            <div class="review-item">A bit heavy</div>
            <div class="review-item">Fourth review never sent</div>
        </body></html>"#;
        let fetcher = MockFetcher::new().with_page("https://x/1", page);
        let listings = vec![listing("Galaxy S24 Ultra", "Rs. 350,000", "https://x/1", "")];
        let ai = MockGenerator::new()
            .with_response("1. EXECUTIVE SUMMARY\nFine.\n7. FINAL VERDICT\nBuy it.")
            .with_response("BEST OPTION: Galaxy S24 Ultra\nREASON: Only candidate.");

        deep_compare(
            Some(&ai),
            &fetcher,
            &listings,
            crate::types::config::Category::Phones,
            &["price"],
        )
        .await;

        let prompt = &ai.prompts()[0];
        assert!(prompt.contains("Original price: Rs. 400,000"));
        assert!(prompt.contains("Shipping: Free islandwide delivery"));
        assert!(prompt.contains("Customer review: Great battery life"));
        assert!(prompt.contains("A bit heavy"));
        // Only the top three reviews are forwarded.
        assert!(!prompt.contains("Fourth review never sent"));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("4.7 out of 5"), Some(4.7));
        assert_eq!(leading_number("(123 ratings)"), Some(123.0));
        assert_eq!(leading_number("no digits"), None);
    }
}

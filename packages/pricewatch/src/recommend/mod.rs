//! Similar-product recommendations: TF-IDF name similarity plus
//! brand and price-proximity bonuses.

mod tfidf;

pub use tfidf::{cosine_similarity, tokenize, TfIdf};

use tracing::debug;

use crate::adapters::filters::known_brand;
use crate::price::parse_price;
use crate::types::listing::Listing;
use crate::types::recommendation::Recommendation;

/// Fixed bonus when the candidate names the same brand as the query.
const BRAND_BONUS: f32 = 0.2;

/// Weight of the price-proximity term (applied only with a budget).
const PROXIMITY_WEIGHT: f32 = 0.1;

/// Rank candidates by similarity to a query product name.
///
/// With `max_price` set, candidates above the budget are dropped, and
/// so are candidates whose price does not parse (an unverifiable price
/// cannot be shown under a budget). With no budget every candidate
/// stays in, parseable or not.
///
/// Composite score = cosine similarity + brand bonus + proximity
/// bonus. The sort is stable, so equal composites keep input order.
pub fn recommend(
    query: &str,
    candidates: &[Listing],
    max_price: Option<i64>,
    top_n: usize,
) -> Vec<Recommendation> {
    let eligible: Vec<&Listing> = candidates
        .iter()
        .filter(|l| l.has_name())
        .filter(|l| match max_price {
            Some(max) => matches!(parse_price(&l.price), Some(p) if p <= max),
            None => true,
        })
        .collect();

    if eligible.is_empty() {
        return Vec::new();
    }

    let query_tokens = tokenize(query);
    let mut corpus: Vec<Vec<String>> = Vec::with_capacity(eligible.len() + 1);
    corpus.push(query_tokens.clone());
    corpus.extend(eligible.iter().map(|l| tokenize(&l.name)));

    let model = TfIdf::fit(&corpus);
    let query_vector = model.vectorize(&query_tokens);

    let query_brand = known_brand(query);

    let mut scored: Vec<Recommendation> = eligible
        .iter()
        .zip(&corpus[1..])
        .map(|(listing, tokens)| {
            let similarity = cosine_similarity(&query_vector, &model.vectorize(tokens));

            let brand_bonus = if brands_match(query, query_brand, &listing.name) {
                BRAND_BONUS
            } else {
                0.0
            };

            let proximity_bonus = match (max_price, parse_price(&listing.price)) {
                (Some(max), Some(price)) if max > 0 => {
                    PROXIMITY_WEIGHT * (price as f32 / max as f32)
                }
                _ => 0.0,
            };

            Recommendation {
                name: listing.name.clone(),
                price: listing.price.clone(),
                url: listing.url.clone(),
                similarity_score: similarity,
                composite_score: similarity + brand_bonus + proximity_bonus,
            }
        })
        .collect();

    // Stable by construction: equal composites keep candidate order.
    scored.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_n);

    debug!(
        query,
        candidates = candidates.len(),
        returned = scored.len(),
        "recommendation ranking done"
    );
    scored
}

/// Brand agreement between query and candidate.
///
/// Both resolve through the known-brand vocabulary (so "Redmi Note"
/// matches a "Xiaomi 14" query); when neither names a known brand, the
/// first word of each is compared instead.
fn brands_match(query: &str, query_brand: Option<&'static str>, candidate: &str) -> bool {
    match (query_brand, known_brand(candidate)) {
        (Some(q), Some(c)) => q == c,
        (None, None) => {
            let first = |s: &str| s.split_whitespace().next().map(str::to_lowercase);
            matches!((first(query), first(candidate)), (Some(a), Some(b)) if a == b)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::listing;

    fn candidates() -> Vec<Listing> {
        vec![
            listing("Samsung Galaxy S24 Ultra", "Rs. 350,000", "https://x/1", ""),
            listing("Samsung Galaxy A55", "Rs. 120,000", "https://x/2", ""),
            listing("Dell Inspiron 15", "Rs. 200,000", "https://x/3", ""),
            listing("Xiaomi Redmi Note 13", "Rs. 80,000", "https://x/4", ""),
        ]
    }

    #[test]
    fn test_same_brand_ranks_first() {
        let results = recommend("Samsung Galaxy S24", &candidates(), None, 3);
        assert_eq!(results[0].name, "Samsung Galaxy S24 Ultra");
        assert!(results[0].similarity_score > 0.0);
        assert!(results[0].composite_score > results[0].similarity_score);
    }

    #[test]
    fn test_brand_and_similarity_beat_other_brand() {
        let cands = vec![
            listing("Samsung Galaxy S24 Ultra", "Rs. 350,000", "https://x/1", ""),
            listing("Apple iPhone 15", "Rs. 300,000", "https://x/2", ""),
        ];
        let results = recommend("Samsung Galaxy S24", &cands, None, 2);
        assert_eq!(results[0].name, "Samsung Galaxy S24 Ultra");
        assert!(results[0].composite_score > results[1].composite_score);
    }

    #[test]
    fn test_budget_drops_expensive_and_unpriced() {
        let mut cands = candidates();
        cands.push(listing("Samsung Galaxy S24 FE", "No Price", "https://x/5", ""));

        let results = recommend("Samsung Galaxy S24", &cands, Some(150_000), 10);
        assert!(results.iter().all(|r| r.name != "Samsung Galaxy S24 Ultra"));
        assert!(results.iter().all(|r| r.name != "Samsung Galaxy S24 FE"));
        assert!(results.iter().any(|r| r.name == "Samsung Galaxy A55"));
    }

    #[test]
    fn test_no_budget_keeps_unpriced_candidates() {
        let mut cands = candidates();
        cands.push(listing("Samsung Galaxy S24 FE", "No Price", "https://x/5", ""));

        let results = recommend("Samsung Galaxy S24", &cands, None, 10);
        assert!(results.iter().any(|r| r.name == "Samsung Galaxy S24 FE"));
    }

    #[test]
    fn test_top_n_truncation() {
        let results = recommend("Samsung Galaxy", &candidates(), None, 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let cands = vec![
            listing("Nokia 3310", "Rs. 10,000", "https://x/1", ""),
            listing("Nokia 3310", "Rs. 10,000", "https://x/2", ""),
        ];
        let results = recommend("Nokia 3310", &cands, None, 2);
        assert_eq!(results[0].url, "https://x/1");
        assert_eq!(results[1].url, "https://x/2");
    }

    #[test]
    fn test_proximity_bonus_only_under_budget() {
        let cands = vec![
            listing("Nokia 3310 blue", "Rs. 9,000", "https://x/1", ""),
            listing("Nokia 3310 red", "Rs. 1,000", "https://x/2", ""),
        ];
        // Same similarity and brand; the pricier one sits closer to
        // the budget and gets the larger proximity bonus.
        let results = recommend("Nokia 3310", &cands, Some(10_000), 2);
        assert_eq!(results[0].url, "https://x/1");
        assert!(results[0].composite_score > results[1].composite_score);
    }

    #[test]
    fn test_composite_never_below_similarity() {
        // Bonuses only ever add on top of the similarity term.
        for r in recommend("Samsung Galaxy S24", &candidates(), Some(400_000), 10) {
            assert!(r.composite_score >= r.similarity_score);
        }
    }

    #[test]
    fn test_brand_bonus_lifts_composite() {
        let cands = vec![
            listing("Galaxy flagship phone", "Rs. 100,000", "https://x/1", ""),
            listing("Pixel flagship phone", "Rs. 100,000", "https://x/2", ""),
        ];
        // Equal similarity structure; only the Samsung alias matches
        // the query brand, so its composite must come out ahead.
        let results = recommend("Samsung flagship", &cands, None, 2);
        assert_eq!(results[0].url, "https://x/1");
        assert!(results[0].composite_score > results[1].composite_score);
    }

    #[test]
    fn test_sentinel_names_excluded() {
        let cands = vec![listing("No Name", "Rs. 1,000", "https://x/1", "")];
        assert!(recommend("Samsung", &cands, None, 5).is_empty());
    }
}

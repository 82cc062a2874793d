//! Side-by-side comparison of selected listings.
//!
//! Builds a feature matrix from heuristic spec extraction, computes
//! per-priority highlights, and picks the single best option: via the
//! collaborator when one is wired in, via a deterministic heuristic
//! otherwise. The collaborator's answer must end with a parseable
//! two-line tail; anything else falls back to the heuristic.

pub mod detail;
pub mod specs;

pub use detail::{deep_compare, scrape_details};
pub use specs::{extract_specs, feature_keys};

use tracing::{info, warn};

use crate::ai::TextGenerator;
use crate::price::parse_price;
use crate::prompts::format_best_option;
use crate::types::comparison::{
    BestPick, Comparison, ComparisonRow, FeatureMatrix, FeatureRow, PickSource, SpecValue,
};
use crate::types::config::Category;
use crate::types::listing::Listing;

/// Compare a set of selected listings against the buyer's priority
/// keywords.
pub async fn compare(
    ai: Option<&dyn TextGenerator>,
    listings: &[Listing],
    category: Category,
    priorities: &[&str],
) -> Comparison {
    let rows: Vec<ComparisonRow> = listings
        .iter()
        .map(|l| ComparisonRow {
            name: l.name.clone(),
            price: l.price.clone(),
            brand: l.brand.clone(),
            source: l.source.clone(),
            url: l.url.clone(),
            specs: extract_specs(&l.name, category),
        })
        .collect();

    let matrix = build_matrix(&rows, category);
    let highlights = build_highlights(&rows, category, priorities);
    let best = pick_best(ai, &rows, priorities).await;

    Comparison {
        rows,
        matrix,
        highlights,
        best,
    }
}

/// Canonical feature matrix: price first, then the category's spec
/// features, then provenance.
fn build_matrix(rows: &[ComparisonRow], category: Category) -> FeatureMatrix {
    let mut headers = vec!["Feature".to_string()];
    headers.extend(rows.iter().map(|r| r.name.clone()));

    let mut matrix_rows = vec![FeatureRow {
        feature: "Price".to_string(),
        cells: rows.iter().map(|r| r.price.clone()).collect(),
    }];

    for &key in feature_keys(category) {
        matrix_rows.push(FeatureRow {
            feature: capitalize(key),
            cells: rows
                .iter()
                .map(|r| {
                    r.specs
                        .get(key)
                        .map(|v| v.display().to_string())
                        .unwrap_or_else(|| SpecValue::UNKNOWN_MARKER.to_string())
                })
                .collect(),
        });
    }

    matrix_rows.push(FeatureRow {
        feature: "Brand".to_string(),
        cells: rows.iter().map(|r| r.brand.clone()).collect(),
    });
    matrix_rows.push(FeatureRow {
        feature: "Source".to_string(),
        cells: rows.iter().map(|r| r.source.clone()).collect(),
    });

    FeatureMatrix {
        headers,
        rows: matrix_rows,
    }
}

/// One winner line per priority keyword that names a recognized
/// feature, in the order the priorities were given.
///
/// "price" is lower-better; every other recognized numeric spec is
/// higher-better. Priorities that name no feature of the category are
/// skipped, unknown cells never win and never block a winner.
fn build_highlights(
    rows: &[ComparisonRow],
    category: Category,
    priorities: &[&str],
) -> Vec<String> {
    let mut highlights = Vec::new();

    for priority in priorities {
        if priority.eq_ignore_ascii_case("price") {
            if let Some((winner, _)) = rows
                .iter()
                .filter_map(|r| parse_price(&r.price).map(|p| (r, p)))
                .min_by_key(|(_, p)| *p)
            {
                highlights.push(format!("Best price: {} ({})", winner.name, winner.price));
            }
            continue;
        }

        let Some(&key) = feature_keys(category)
            .iter()
            .find(|k| k.eq_ignore_ascii_case(priority))
        else {
            continue;
        };
        let winner = rows
            .iter()
            .filter_map(|r| {
                r.specs
                    .get(key)
                    .and_then(SpecValue::numeric)
                    .map(|n| (r, n))
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((row, _)) = winner {
            let value = row.specs[key].display();
            highlights.push(format!("Best {}: {} ({})", key, row.name, value));
        }
    }

    highlights
}

/// Select listings out of a stored collection by URL (the join key).
///
/// Order follows the requested URLs; unknown URLs are skipped.
pub fn select_by_urls(collection: &[Listing], urls: &[&str]) -> Vec<Listing> {
    urls.iter()
        .filter_map(|url| collection.iter().find(|l| l.url == *url))
        .cloned()
        .collect()
}

/// Choose the single best listing.
async fn pick_best(
    ai: Option<&dyn TextGenerator>,
    rows: &[ComparisonRow],
    priorities: &[&str],
) -> BestPick {
    if let Some(ai) = ai {
        match ai.generate(&format_best_option(rows, &priorities.join(", "))).await {
            Ok(answer) => {
                if let Some(pick) = parse_pick_tail(&answer, rows) {
                    info!(pick = %pick.name, "assistant chose best option");
                    return pick;
                }
                warn!("assistant answer missing parseable tail, using heuristic");
            }
            Err(e) => warn!(error = %e, "assistant pick failed, using heuristic"),
        }
    }
    heuristic_pick(rows, priorities)
}

/// Parse the mandatory `BEST OPTION:` / `REASON:` tail, scanning from
/// the end so preceding free-form reasoning never confuses it. The
/// named option must match one of the rows.
fn parse_pick_tail(answer: &str, rows: &[ComparisonRow]) -> Option<BestPick> {
    let mut name = None;
    let mut reason = None;
    for line in answer.lines().rev() {
        let line = line.trim();
        if reason.is_none() {
            if let Some(r) = line.strip_prefix("REASON:") {
                reason = Some(r.trim().to_string());
                continue;
            }
        }
        if let Some(n) = line.strip_prefix("BEST OPTION:") {
            name = Some(n.trim().to_string());
            break;
        }
    }

    let (name, reason) = name.zip(reason)?;
    let row = rows.iter().find(|r| {
        r.name.eq_ignore_ascii_case(&name)
            || r.name.to_lowercase().contains(&name.to_lowercase())
    })?;

    Some(BestPick {
        name: row.name.clone(),
        rationale: reason,
        via: PickSource::Assistant,
    })
}

/// Deterministic pick: when "price" is among the priorities, the
/// lowest parseable price wins; otherwise the first listing. The
/// rationale names only the features where the pick is strictly best.
fn heuristic_pick(rows: &[ComparisonRow], priorities: &[&str]) -> BestPick {
    let price_priority = priorities.iter().any(|p| p.eq_ignore_ascii_case("price"));
    let chosen = if price_priority {
        rows.iter()
            .filter_map(|r| parse_price(&r.price).map(|p| (r, p)))
            .min_by_key(|(_, p)| *p)
            .map(|(r, _)| r)
            .or_else(|| rows.first())
    } else {
        rows.first()
    };

    let Some(chosen) = chosen else {
        return BestPick {
            name: String::new(),
            rationale: "No listings to compare.".to_string(),
            via: PickSource::Heuristic,
        };
    };

    let mut strengths = Vec::new();
    if strictly_lowest_price(chosen, rows) {
        strengths.push("the lowest price".to_string());
    }
    for (key, value) in &chosen.specs {
        if let Some(n) = value.numeric() {
            let strictly_best = rows
                .iter()
                .filter(|r| !std::ptr::eq(*r, chosen))
                .all(|r| match r.specs.get(key).and_then(SpecValue::numeric) {
                    Some(other) => n > other,
                    None => true,
                });
            if strictly_best {
                strengths.push(format!("the highest {}", key));
            }
        }
    }

    let rationale = if strengths.is_empty() {
        "Best overall match for your priority.".to_string()
    } else {
        format!("Offers {}.", strengths.join(" and "))
    };

    BestPick {
        name: chosen.name.clone(),
        rationale,
        via: PickSource::Heuristic,
    }
}

fn strictly_lowest_price(chosen: &ComparisonRow, rows: &[ComparisonRow]) -> bool {
    let Some(price) = parse_price(&chosen.price) else {
        return false;
    };
    rows.iter()
        .filter(|r| !std::ptr::eq(*r, chosen))
        .all(|r| match parse_price(&r.price) {
            Some(other) => price < other,
            None => true,
        })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

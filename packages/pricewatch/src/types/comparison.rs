//! Comparison result types: feature matrix, best pick, deep analysis.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An extracted pseudo-spec value, or the explicit unknown marker.
///
/// Specs are heuristic pattern matches over listing names; absence is
/// always represented as `Unknown`, never a guessed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Value(String),
    Unknown,
}

impl SpecValue {
    /// Display marker for unknown cells.
    pub const UNKNOWN_MARKER: &'static str = "unknown";

    /// The cell text: the value, or the unknown marker.
    pub fn display(&self) -> &str {
        match self {
            SpecValue::Value(v) => v,
            SpecValue::Unknown => Self::UNKNOWN_MARKER,
        }
    }

    /// First numeric group of the value, if any.
    ///
    /// `"8 GB"` → `8.0`, `"6.1 in"` → `6.1`, `Unknown` → `None`.
    pub fn numeric(&self) -> Option<f64> {
        let SpecValue::Value(v) = self else {
            return None;
        };
        let mut start = None;
        let mut end = 0;
        for (i, c) in v.char_indices() {
            if c.is_ascii_digit() || (start.is_some() && c == '.') {
                if start.is_none() {
                    start = Some(i);
                }
                end = i + c.len_utf8();
            } else if start.is_some() {
                break;
            }
        }
        start.and_then(|s| v[s..end].parse().ok())
    }
}

/// One selected listing with its extracted specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub price: String,
    pub brand: String,
    pub source: String,
    pub url: String,

    /// Sparse mapping of canonical feature keys to extracted values.
    pub specs: IndexMap<String, SpecValue>,
}

/// Feature matrix: canonical feature rows by listing-name columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    /// `"Feature"` followed by the listing names, in input order.
    pub headers: Vec<String>,

    /// One row per canonical feature.
    pub rows: Vec<FeatureRow>,
}

/// One row of the feature matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Canonical feature key (capitalized for display).
    pub feature: String,

    /// Cell per listing: extracted value or the unknown marker.
    pub cells: Vec<String>,
}

/// How the overall best pick was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickSource {
    /// The text-generation collaborator chose and explained it.
    Assistant,

    /// The deterministic offline heuristic chose it.
    Heuristic,
}

/// The overall best pick with a feature-grounded rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestPick {
    pub name: String,
    pub rationale: String,
    pub via: PickSource,
}

/// Result of comparing a set of selected listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// Per-listing rows with extracted specs.
    pub rows: Vec<ComparisonRow>,

    /// Feature matrix over all rows.
    pub matrix: FeatureMatrix,

    /// Per-priority single-feature winners
    /// (e.g. `"Best price: X (Rs. 180,000)"`).
    pub highlights: Vec<String>,

    /// Overall best pick.
    pub best: BestPick,
}

/// One scraped customer review from a product detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Review {
    pub rating: Option<u8>,
    pub text: String,
}

/// Full product details scraped from a detail page.
///
/// Every field is best-effort; extraction misses leave the field
/// empty/`None` rather than failing the scrape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    pub url: String,
    pub name: String,
    pub price: String,
    pub original_price: String,
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
    pub specifications: IndexMap<String, String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub availability: String,
    pub seller: String,
    pub warranty: String,
    pub shipping: String,
    pub description: String,
    pub reviews: Vec<Review>,
}

impl ProductDetails {
    /// True when the detail scrape recovered at least a name.
    pub fn is_populated(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Sectioned narrative analysis from the deep-enrichment path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub executive_summary: String,
    pub detailed_comparison: String,
    pub strengths_weaknesses: String,
    pub priority_alignment: String,
    pub recommendations: String,
    pub buying_advice: String,
    pub final_verdict: String,
}

/// Narrative analysis with the raw collaborator text preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    pub full_text: String,
    pub sections: AnalysisSections,
}

/// Result of the optional deep-enrichment comparison path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepComparison {
    /// Per-listing scraped details, in input order; unpopulated entries
    /// mark listings whose detail scrape failed.
    pub details: Vec<ProductDetails>,

    /// Expanded narrative analysis (collaborator or fallback).
    pub analysis: Analysis,

    /// Best single pick (collaborator or fallback).
    pub best: BestPick,

    /// Fraction of listings whose detail scrape succeeded.
    pub success_ratio: f32,
}

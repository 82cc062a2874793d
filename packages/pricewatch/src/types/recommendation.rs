//! Ranked recommendation produced per query.

use serde::{Deserialize, Serialize};

/// One ranked candidate for a recommendation query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Candidate listing title.
    pub name: String,

    /// Candidate price string as scraped.
    pub price: String,

    /// Candidate URL.
    pub url: String,

    /// Raw TF-IDF cosine similarity between query and candidate name.
    pub similarity_score: f32,

    /// Similarity plus brand-match and price-proximity bonuses; the
    /// ranking key.
    pub composite_score: f32,
}

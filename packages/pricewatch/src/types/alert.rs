//! Price alert: a listing found below its threshold.

use serde::{Deserialize, Serialize};

/// A below-threshold finding for one listing.
///
/// Transient: produced per evaluation, never persisted as part of the
/// listing store (callers may dump the set as an ephemeral side
/// artifact for notification purposes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Listing title.
    pub name: String,

    /// The listing's price string as scraped.
    pub current_price: String,

    /// The threshold string the price was compared against.
    pub threshold: String,

    /// Listing URL (the join key back to the listing).
    pub url: String,

    /// Parsed threshold minus parsed price; strictly positive.
    pub savings: i64,
}

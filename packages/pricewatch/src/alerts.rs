//! Threshold evaluation: find listings priced below their target.

use tracing::{debug, info, warn};

use crate::ai::TextGenerator;
use crate::price::parse_price;
use crate::prompts::format_alert_summary;
use crate::types::alert::Alert;
use crate::types::listing::Listing;

/// Evaluate every listing against its own threshold.
///
/// A listing alerts when both its price and threshold parse and the
/// price is strictly below the threshold. Sentinel and unparseable
/// rows are skipped silently; output preserves input order.
pub fn check_prices(listings: &[Listing]) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for listing in listings {
        if !listing.has_name() {
            continue;
        }
        let Some(price) = parse_price(&listing.price) else {
            continue;
        };
        let Some(threshold) = parse_price(&listing.threshold) else {
            continue;
        };
        if price < threshold {
            alerts.push(Alert {
                name: listing.name.clone(),
                current_price: listing.price.clone(),
                threshold: listing.threshold.clone(),
                url: listing.url.clone(),
                savings: threshold - price,
            });
        }
    }
    debug!(
        evaluated = listings.len(),
        alerted = alerts.len(),
        "threshold evaluation done"
    );
    alerts
}

/// The listings backing the alert set, in input order.
///
/// Same predicate as [`check_prices`]; used to seed recommendations
/// from deal listings.
pub fn filter_below_threshold(listings: &[Listing]) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| {
            l.has_name()
                && matches!(
                    (parse_price(&l.price), parse_price(&l.threshold)),
                    (Some(p), Some(t)) if p < t
                )
        })
        .cloned()
        .collect()
}

/// Summarize an alert set in plain language.
///
/// Consults the collaborator when one is wired in; on absence or
/// failure, a deterministic summary (count and total savings) is
/// produced instead, never an error.
pub async fn summarize_alerts(ai: Option<&dyn TextGenerator>, alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No products are below their target prices right now.".to_string();
    }

    if let Some(ai) = ai {
        match ai.generate(&format_alert_summary(alerts)).await {
            Ok(summary) if !summary.trim().is_empty() => {
                info!(alerts = alerts.len(), "assistant summarized alerts");
                return summary.trim().to_string();
            }
            Ok(_) => warn!("assistant returned an empty summary, using fallback"),
            Err(e) => warn!(error = %e, "assistant summary failed, using fallback"),
        }
    }

    let total: i64 = alerts.iter().map(|a| a.savings).sum();
    format!(
        "{} product(s) dropped below their target prices, for a combined saving of {}.",
        alerts.len(),
        total
    )
}

//! Prompt templates for the text-generation collaborator.
//!
//! Templates use `{placeholder}` markers filled by the `format_*`
//! helpers. Keeping them here, away from the call sites, makes prompt
//! changes reviewable in one place.

use crate::types::alert::Alert;
use crate::types::comparison::ComparisonRow;
use crate::types::listing::Listing;

/// Summarize a batch of price alerts in plain language.
pub const ALERT_SUMMARY_PROMPT: &str = r#"You are a shopping assistant. The following products dropped below their target prices:

{alerts}

Write a short, friendly summary (2-3 sentences) of the best deals. Mention the biggest saving explicitly. Do not invent products that are not listed."#;

/// Pick the single best option from a comparison table.
///
/// The scoring rules and the fixed two-line tail make the response
/// machine-parseable; anything that does not end with the tail is
/// discarded in favor of the deterministic fallback.
pub const BEST_OPTION_PROMPT: &str = r#"You are comparing products for a buyer whose priority is: {priority}.

Products:
{rows}

Scoring rules:
- Award one point per feature where a product is strictly better than every other product.
- For price, lower is better. For ram, storage, camera, battery and display, higher is better.
- Ignore features marked "unknown".
- The product with the most points wins. Break ties in favor of the buyer's priority.

Answer with your reasoning, then finish with exactly these two lines:
BEST OPTION: <product name>
REASON: <one sentence>"#;

/// Expanded multi-section comparison analysis.
pub const DEEP_ANALYSIS_PROMPT: &str = r#"You are an expert product analyst. Compare the following products for a buyer whose priority is: {priority}.

Product data:
{details}

Write a structured analysis with exactly these numbered sections:
1. EXECUTIVE SUMMARY
2. DETAILED COMPARISON
3. STRENGTHS AND WEAKNESSES
4. PRIORITY ALIGNMENT
5. RECOMMENDATIONS
6. BUYING ADVICE
7. FINAL VERDICT

Be specific and cite the product data. Keep each section under 120 words."#;

/// Render one alert as a prompt line.
fn alert_line(alert: &Alert) -> String {
    format!(
        "- {} now at {} (target {}, saving {})",
        alert.name, alert.current_price, alert.threshold, alert.savings
    )
}

/// Fill [`ALERT_SUMMARY_PROMPT`].
pub fn format_alert_summary(alerts: &[Alert]) -> String {
    let lines: Vec<String> = alerts.iter().map(alert_line).collect();
    ALERT_SUMMARY_PROMPT.replace("{alerts}", &lines.join("\n"))
}

/// Fill [`BEST_OPTION_PROMPT`] from comparison rows.
pub fn format_best_option(rows: &[ComparisonRow], priority: &str) -> String {
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let specs: Vec<String> = row
                .specs
                .iter()
                .map(|(feature, value)| format!("{}: {}", feature, value.display()))
                .collect();
            format!(
                "- {} | price: {} | {} | source: {}",
                row.name,
                row.price,
                specs.join(" | "),
                row.source
            )
        })
        .collect();
    BEST_OPTION_PROMPT
        .replace("{priority}", priority)
        .replace("{rows}", &lines.join("\n"))
}

/// Fill [`DEEP_ANALYSIS_PROMPT`] from rendered product detail blocks.
pub fn format_deep_analysis(details: &str, priority: &str) -> String {
    DEEP_ANALYSIS_PROMPT
        .replace("{priority}", priority)
        .replace("{details}", details)
}

/// Render listings as prompt lines (used by recommendation prompts and
/// ad-hoc queries).
pub fn format_listing_lines(listings: &[Listing]) -> String {
    listings
        .iter()
        .map(|l| format!("- {} | {} | {}", l.name, l.price, l.source))
        .collect::<Vec<_>>()
        .join("\n")
}

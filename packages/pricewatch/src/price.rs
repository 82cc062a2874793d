//! Free-text price normalization.
//!
//! Listing prices arrive as strings like `"Rs. 12,500"` or
//! `"Rs.12500"` and sometimes as the `"No Price"` sentinel. Parsing
//! extracts the first contiguous digit group (with optional thousands
//! separators), strips the separators, and yields an integer. Absence
//! is an expected outcome, not an error: every caller treats `None` as
//! "cannot compare".

use regex::Regex;

use crate::types::listing::NO_PRICE;

/// Extract the numeric value from a free-text price string.
///
/// Returns `None` for the `"No Price"` sentinel, empty input, or
/// strings with no digit group.
///
/// ```
/// use pricewatch::price::parse_price;
///
/// assert_eq!(parse_price("Rs. 12,500"), Some(12_500));
/// assert_eq!(parse_price("Rs.12500"), Some(12_500));
/// assert_eq!(parse_price("No Price"), None);
/// ```
pub fn parse_price(price_str: &str) -> Option<i64> {
    let trimmed = price_str.trim();
    if trimmed.is_empty() || trimmed == NO_PRICE {
        return None;
    }

    let digit_group = Regex::new(r"[\d,]*\d").unwrap();
    let group = digit_group.find(trimmed)?;
    group.as_str().replace(',', "").parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parses_thousands_separators() {
        assert_eq!(parse_price("Rs. 12,500"), Some(12_500));
        assert_eq!(parse_price("Rs.12,500"), Some(12_500));
        assert_eq!(parse_price("Rs. 300,000"), Some(300_000));
        assert_eq!(parse_price("Rs. 400000"), Some(400_000));
        assert_eq!(parse_price("LKR 1,234,567"), Some(1_234_567));
    }

    #[test]
    fn test_first_digit_group_wins() {
        // Discounted listings often carry two prices; the first wins.
        assert_eq!(parse_price("Rs. 180,000 Rs. 200,000"), Some(180_000));
    }

    #[test]
    fn test_sentinel_and_empty() {
        assert_eq!(parse_price("No Price"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(parse_price("Call for price"), None);
        assert_eq!(parse_price("Rs. ---"), None);
    }

    #[test]
    fn test_no_leading_separator() {
        // A stray comma before the digits must not break the parse.
        assert_eq!(parse_price(",500"), Some(500));
    }

    proptest! {
        #[test]
        fn prop_plain_integers_round_trip(n in 0i64..10_000_000) {
            prop_assert_eq!(parse_price(&format!("Rs. {}", n)), Some(n));
        }

        #[test]
        fn prop_grouped_integers_strip_separators(n in 0i64..10_000_000) {
            // Insert separators every three digits from the right.
            let digits = n.to_string();
            let mut grouped = String::new();
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(c);
            }
            prop_assert_eq!(parse_price(&format!("Rs. {}", grouped)), Some(n));
        }

        #[test]
        fn prop_digit_free_strings_yield_none(s in "[^0-9]*") {
            prop_assert_eq!(parse_price(&s), None);
        }
    }
}

//! Heuristic spec extraction from listing names.
//!
//! Listing titles on these sites usually embed headline specs
//! ("Galaxy A55 8GB RAM 256GB 50MP 5000mAh 6.6 inch"). Each category
//! carries a pattern table; a feature whose pattern does not match is
//! reported as [`SpecValue::Unknown`], never guessed.

use indexmap::IndexMap;
use regex::Regex;

use crate::types::comparison::SpecValue;
use crate::types::config::Category;

/// Canonical feature keys for a category, in display order.
pub fn feature_keys(category: Category) -> &'static [&'static str] {
    match category {
        Category::Phones | Category::Laptops => {
            &["ram", "storage", "camera", "battery", "display"]
        }
        Category::Headphones => &[
            "driver",
            "frequency",
            "impedance",
            "battery",
            "wireless",
            "noise cancellation",
        ],
    }
}

/// Extract every canonical feature of a category from a listing name.
///
/// Matching is case-insensitive; the returned map carries every
/// canonical key, unknowns included.
pub fn extract_specs(name: &str, category: Category) -> IndexMap<String, SpecValue> {
    let text = name.to_lowercase();
    feature_keys(category)
        .iter()
        .map(|&key| (key.to_string(), extract_feature(&text, category, key)))
        .collect()
}

fn extract_feature(text: &str, category: Category, key: &str) -> SpecValue {
    let value = match (category, key) {
        (Category::Phones | Category::Laptops, "ram") => {
            capture(text, r"(\d{1,2})\s?gb\s?ram", "GB")
                .or_else(|| capture(text, r"\b(\d{1,2})\s?gb\b", "GB"))
        }
        (Category::Phones | Category::Laptops, "storage") => {
            capture(text, r"(\d{2,4})\s?gb\s?(?:storage|rom)", "GB")
                .or_else(|| capture(text, r"(\d)\s?tb", "TB"))
                .or_else(|| capture(text, r"\b(\d{3,4})\s?gb\b", "GB"))
        }
        (Category::Phones | Category::Laptops, "camera") => {
            capture(text, r"(\d{2,3})\s?mp\b", "MP")
        }
        (Category::Phones | Category::Laptops, "battery") => {
            capture(text, r"(\d{3,5})\s?mah\b", "mAh")
        }
        (Category::Phones | Category::Laptops, "display") => {
            capture(text, r"(\d{1,2}(?:\.\d)?)\s?(?:inch|in\b)", "in")
        }
        (Category::Headphones, "driver") => capture(text, r"(\d{1,2})\s?mm\b", "mm"),
        (Category::Headphones, "frequency") => frequency_range(text),
        (Category::Headphones, "impedance") => {
            // Text is lowercased, so Ω arrives as ω.
            capture(text, r"(\d{1,3})\s?(?:ohm|ω)", "ohm")
        }
        (Category::Headphones, "battery") => {
            capture(text, r"(\d{1,3})\s?(?:hours|hrs|hr|h)\b", "h")
        }
        (Category::Headphones, "wireless") => {
            flag(text, &["wireless", "bluetooth", "true wireless", "tws"])
        }
        (Category::Headphones, "noise cancellation") => {
            flag(text, &["anc", "noise cancel", "noise-cancel"])
        }
        _ => None,
    };
    value.map(SpecValue::Value).unwrap_or(SpecValue::Unknown)
}

/// First capture of a pattern, rendered with a unit.
fn capture(text: &str, pattern: &str, unit: &str) -> Option<String> {
    // Patterns are static literals; they always compile.
    Regex::new(pattern)
        .unwrap()
        .captures(text)
        .map(|c| format!("{} {}", &c[1], unit))
}

/// A "20Hz - 20kHz" style range.
fn frequency_range(text: &str) -> Option<String> {
    Regex::new(r"(\d+)\s?hz\s?-\s?(\d+)\s?khz")
        .unwrap()
        .captures(text)
        .map(|c| format!("{} Hz - {} kHz", &c[1], &c[2]))
}

fn flag(text: &str, keywords: &[&str]) -> Option<String> {
    keywords
        .iter()
        .any(|kw| text.contains(kw))
        .then(|| "Yes".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_specs_from_dense_title() {
        let specs = extract_specs(
            "Samsung Galaxy A55 8GB RAM 256GB Storage 50MP 5000mAh 6.6 inch",
            Category::Phones,
        );
        assert_eq!(specs["ram"], SpecValue::Value("8 GB".into()));
        assert_eq!(specs["storage"], SpecValue::Value("256 GB".into()));
        assert_eq!(specs["camera"], SpecValue::Value("50 MP".into()));
        assert_eq!(specs["battery"], SpecValue::Value("5000 mAh".into()));
        assert_eq!(specs["display"], SpecValue::Value("6.6 in".into()));
    }

    #[test]
    fn test_absent_features_are_unknown() {
        let specs = extract_specs("Samsung Galaxy S24", Category::Phones);
        assert!(specs.values().all(|v| *v == SpecValue::Unknown));
        // Every canonical key is present even when unknown.
        assert_eq!(specs.len(), feature_keys(Category::Phones).len());
    }

    #[test]
    fn test_laptop_terabyte_storage() {
        let specs = extract_specs("Dell XPS 15 16GB RAM 1TB SSD", Category::Laptops);
        assert_eq!(specs["ram"], SpecValue::Value("16 GB".into()));
        assert_eq!(specs["storage"], SpecValue::Value("1 TB".into()));
    }

    #[test]
    fn test_headphone_specs() {
        let specs = extract_specs(
            "Sony WH-1000XM5 Wireless ANC 30h battery 40mm driver",
            Category::Headphones,
        );
        assert_eq!(specs["wireless"], SpecValue::Value("Yes".into()));
        assert_eq!(specs["noise cancellation"], SpecValue::Value("Yes".into()));
        assert_eq!(specs["battery"], SpecValue::Value("30 h".into()));
        assert_eq!(specs["driver"], SpecValue::Value("40 mm".into()));
        assert_eq!(specs["impedance"], SpecValue::Unknown);
    }

    #[test]
    fn test_frequency_range() {
        let specs = extract_specs("Studio monitor headphones 20Hz - 20kHz", Category::Headphones);
        assert_eq!(specs["frequency"], SpecValue::Value("20 Hz - 20 kHz".into()));
    }
}

//! The listing record: one scraped product occurrence from one source.

use serde::{Deserialize, Serialize};

/// Sentinel for a title the adapter could not extract.
pub const NO_NAME: &str = "No Name";

/// Sentinel for an absent price.
pub const NO_PRICE: &str = "No Price";

/// Sentinel for an absent link.
pub const NO_URL: &str = "#";

/// One scraped product occurrence.
///
/// `url` is the dedup/join key: two listings with equal `url` are the
/// same product occurrence across threshold evaluation and downstream
/// enrichment. Listings are created in bulk by a scrape and never
/// individually mutated; a rescrape fully replaces the category's
/// stored collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Free-text title, `"No Name"` if extraction failed.
    pub name: String,

    /// Free-text price string (e.g. `"Rs. 12,500"`), `"No Price"` if absent.
    pub price: String,

    /// Absolute link, `"#"` if absent.
    pub url: String,

    /// Free-text target price string, defaulted per category/session.
    pub threshold: String,

    /// Brand facet the listing was queried under, or a category label.
    pub brand: String,

    /// Which site adapter produced it (e.g. `"Daraz"`).
    pub source: String,
}

impl Listing {
    /// Create a listing with sentinel defaults for the optional fields.
    pub fn new(name: impl Into<String>, price: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            url: url.into(),
            threshold: String::new(),
            brand: String::new(),
            source: String::new(),
        }
    }

    /// Set the threshold string.
    pub fn with_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.threshold = threshold.into();
        self
    }

    /// Set the brand facet.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Set the provenance tag.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// True when a real name was extracted.
    pub fn has_name(&self) -> bool {
        self.name != NO_NAME && !self.name.is_empty()
    }

    /// True when a real link was extracted.
    pub fn has_url(&self) -> bool {
        self.url != NO_URL && !self.url.is_empty()
    }
}

/// Normalize a scraped href to an absolute URL.
///
/// Protocol-relative links gain `https:`; root-relative links are
/// joined onto the site base. Anything that already carries a scheme
/// passes through. Absent links stay the `"#"` sentinel.
pub fn normalize_url(href: &str, base: &str) -> String {
    if href.is_empty() || href == NO_URL {
        return NO_URL.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    if href.starts_with('/') {
        return format!("{}{}", base.trim_end_matches('/'), href);
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(
            normalize_url("//www.daraz.lk/products/x", "https://www.daraz.lk"),
            "https://www.daraz.lk/products/x"
        );
    }

    #[test]
    fn test_normalize_root_relative() {
        assert_eq!(
            normalize_url("/products/x", "https://www.singer.lk"),
            "https://www.singer.lk/products/x"
        );
        assert_eq!(
            normalize_url("/products/x", "https://www.singer.lk/"),
            "https://www.singer.lk/products/x"
        );
    }

    #[test]
    fn test_normalize_absolute_passthrough() {
        assert_eq!(
            normalize_url("https://buyabans.com/p/1", "https://buyabans.com"),
            "https://buyabans.com/p/1"
        );
    }

    #[test]
    fn test_normalize_absent() {
        assert_eq!(normalize_url("#", "https://example.com"), "#");
        assert_eq!(normalize_url("", "https://example.com"), "#");
    }

    #[test]
    fn test_serde_field_names_match_store_format() {
        let listing = Listing::new("Phone", "Rs. 1,000", "https://x/p")
            .with_threshold("Rs. 2000")
            .with_brand("Samsung")
            .with_source("Daraz");

        let json = serde_json::to_value(&listing).unwrap();
        for key in ["name", "price", "url", "threshold", "brand", "source"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}

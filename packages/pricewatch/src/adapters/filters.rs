//! Brand and category filters applied to extracted listings.
//!
//! Search result pages mix in accessories and off-brand items; these
//! filters drop them. Brand matching tolerates aliases and sub-brand
//! names (a "Xiaomi" query should keep "Redmi Note 13" listings), so
//! it is table-driven rather than a literal substring check.

use regex::Regex;

use crate::types::config::Category;

/// Known brands with their aliases and sub-brand names.
///
/// The canonical name comes first; matching is case-insensitive on
/// word boundaries.
pub const KNOWN_BRANDS: &[(&str, &[&str])] = &[
    ("Samsung", &["samsung", "galaxy"]),
    ("Apple", &["apple", "iphone", "ipad", "macbook"]),
    ("Xiaomi", &["xiaomi", "redmi", "poco", "mi"]),
    ("Google", &["google", "pixel"]),
    ("Nokia", &["nokia"]),
    ("Vivo", &["vivo"]),
    ("Huawei", &["huawei", "honor"]),
    ("Dell", &["dell", "inspiron", "xps", "latitude", "vostro"]),
    ("ASUS", &["asus", "zenbook", "vivobook", "rog", "tuf"]),
    ("HP", &["hp", "pavilion", "envy", "omen", "victus"]),
    ("Lenovo", &["lenovo", "thinkpad", "ideapad", "legion", "yoga"]),
    ("Acer", &["acer", "aspire", "nitro", "predator", "swift"]),
    ("MSI", &["msi"]),
    ("Sony", &["sony"]),
    ("JBL", &["jbl"]),
    ("Bose", &["bose"]),
    ("Sennheiser", &["sennheiser"]),
    ("Soundcore", &["soundcore", "anker"]),
];

/// Accessory keywords that mark a listing as off-topic for a category.
fn accessory_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Phones => &[
            "case", "cover", "protector", "tempered", "charger", "cable", "adapter", "holder",
            "stand", "skin", "pouch",
        ],
        Category::Laptops => &[
            "bag", "sleeve", "charger", "adapter", "stand", "cooler", "cooling pad", "skin",
            "mouse", "backpack",
        ],
        Category::Headphones => &[
            "case", "cover", "ear tips", "cushion", "earpad", "cable", "stand", "splitter",
        ],
    }
}

/// Find the canonical known brand named in free text, if any.
///
/// Scans the alias table in order and returns the first canonical
/// brand whose alias appears as a whole word.
pub fn known_brand(text: &str) -> Option<&'static str> {
    for (canonical, aliases) in KNOWN_BRANDS {
        for alias in *aliases {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(alias));
            if Regex::new(&pattern).map(|re| re.is_match(text)).unwrap_or(false) {
                return Some(canonical);
            }
        }
    }
    None
}

/// Brand-alias matcher built once per scrape run.
pub struct BrandMatcher {
    regex: Regex,
}

impl BrandMatcher {
    /// Build a matcher for a query brand, expanding known aliases.
    ///
    /// Unknown brands match on the literal word only.
    pub fn for_query(brand: &str) -> Self {
        let aliases = KNOWN_BRANDS
            .iter()
            .find(|(canonical, aliases)| {
                canonical.eq_ignore_ascii_case(brand)
                    || aliases.iter().any(|a| a.eq_ignore_ascii_case(brand))
            })
            .map(|(_, aliases)| *aliases);

        let alternatives = match aliases {
            Some(aliases) => aliases
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|"),
            None => regex::escape(brand),
        };

        let pattern = format!(r"(?i)\b(?:{})\b", alternatives);
        Self {
            // The pattern is built from escaped literals; it always compiles.
            regex: Regex::new(&pattern).unwrap(),
        }
    }

    /// True when the listing name mentions the brand or an alias.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// True when a listing name is an accessory rather than a product of
/// the category.
pub fn is_off_topic(category: Category, name: &str) -> bool {
    let lower = name.to_lowercase();
    accessory_keywords(category)
        .iter()
        .any(|kw| lower.contains(kw))
}

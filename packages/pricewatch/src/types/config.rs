//! Configuration for the scraping pipeline.
//!
//! Brand lists, category-to-file mapping and scrape bounds are
//! explicit data passed into the pipeline, not process-wide globals.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Product category a listing collection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Phones,
    Laptops,
    Headphones,
}

impl Category {
    /// Lowercase label used in store filenames and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Phones => "phones",
            Category::Laptops => "laptops",
            Category::Headphones => "headphones",
        }
    }

    /// Parse a category label; unrecognized labels fall back to phones.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "laptops" | "laptop" => Category::Laptops,
            "headphones" | "headphone" => Category::Headphones,
            _ => Category::Phones,
        }
    }

    /// Brand facets offered for this category.
    pub fn default_brands(&self) -> &'static [&'static str] {
        match self {
            Category::Phones => &[
                "Samsung", "Xiaomi", "Apple", "Google", "Nokia", "Vivo", "Redmi", "Huawei",
            ],
            Category::Laptops => &["Dell", "ASUS", "HP", "Lenovo", "Apple", "Acer", "MSI"],
            Category::Headphones => &["Sony", "JBL", "Bose", "Sennheiser", "Soundcore", "Anker"],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-to-file mapping for the JSON listing stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLayout {
    files: IndexMap<Category, String>,
}

impl Default for StoreLayout {
    fn default() -> Self {
        let mut files = IndexMap::new();
        for category in [Category::Phones, Category::Laptops, Category::Headphones] {
            files.insert(category, format!("{}.json", category.as_str()));
        }
        Self { files }
    }
}

impl StoreLayout {
    /// Create the default layout (`phones.json`, `laptops.json`, ...).
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the file name for one category.
    pub fn with_file(mut self, category: Category, file: impl Into<String>) -> Self {
        self.files.insert(category, file.into());
        self
    }

    /// File name for a category's listing collection.
    pub fn file_for(&self, category: Category) -> String {
        self.files
            .get(&category)
            .cloned()
            .unwrap_or_else(|| format!("{}.json", category.as_str()))
    }
}

/// Bounds and defaults for one scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Maximum listings collected per site.
    pub max_per_site: usize,

    /// Bounded lazy-load retries when no product cards resolve.
    pub scroll_steps: usize,

    /// Bounded "next page" follows per site.
    pub max_pages: usize,

    /// Settle delay between lazy-load retries, in milliseconds.
    pub settle_ms: u64,

    /// Threshold string applied when the caller provides none.
    pub default_threshold: String,

    /// Apply the brand-alias regex filter to extracted names.
    pub brand_filter: bool,

    /// Apply the category keyword filter (drops accessory listings).
    pub category_filter: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_per_site: 40,
            scroll_steps: 5,
            max_pages: 3,
            settle_ms: 1200,
            default_threshold: "Rs. 400000".to_string(),
            brand_filter: false,
            category_filter: false,
        }
    }
}

impl ScrapeConfig {
    /// Create a config with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-site item cap.
    pub fn with_max_per_site(mut self, max: usize) -> Self {
        self.max_per_site = max;
        self
    }

    /// Set the lazy-load retry bound.
    pub fn with_scroll_steps(mut self, steps: usize) -> Self {
        self.scroll_steps = steps;
        self
    }

    /// Set the pagination bound.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the default threshold string.
    pub fn with_default_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.default_threshold = threshold.into();
        self
    }

    /// Enable brand and category filtering of extracted listings.
    pub fn with_filters(mut self, brand: bool, category: bool) -> Self {
        self.brand_filter = brand;
        self.category_filter = category;
        self
    }
}

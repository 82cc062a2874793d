//! Site profiles: one per supported retailer.
//!
//! A profile is pure data: the search URL shape and the ordered
//! fallback selector lists the engine tries against markup that
//! drifts over time. Selectors are brittle by nature and need
//! revisiting when a site ships a redesign; keeping them here means a
//! redesign is a data change, not a code change.

use url::Url;

/// Extraction profile for one retail source.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Provenance tag stamped onto every listing (e.g. `"Daraz"`).
    pub source: &'static str,

    /// Site base URL, used to absolutize root-relative links.
    pub base: &'static str,

    /// Path of the search/catalog page.
    pub search_path: &'static str,

    /// Query parameter carrying the search term.
    pub query_param: &'static str,

    /// Additional fixed query parameters.
    pub extra_params: &'static [(&'static str, &'static str)],

    /// Ordered fallback selectors for product cards; the first one
    /// yielding any matches wins.
    pub card_selectors: &'static [&'static str],

    /// Ordered fallback selectors for the name/link element in a card.
    pub name_selectors: &'static [&'static str],

    /// Ordered fallback selectors for the price element in a card.
    pub price_selectors: &'static [&'static str],

    /// Ordered fallback selectors for the "next page" control.
    pub next_page_selectors: &'static [&'static str],

    /// Keep cards whose name or link extraction missed (sentinels).
    pub keep_sentinel_cards: bool,
}

impl SiteProfile {
    /// Build the search URL for a query term.
    pub fn search_url(&self, query: &str) -> String {
        let mut url = match Url::parse(self.base).and_then(|b| b.join(self.search_path)) {
            Ok(url) => url,
            // Profiles are static data with valid bases; this is
            // unreachable for the built-in set.
            Err(_) => return format!("{}{}", self.base, self.search_path),
        };
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(self.query_param, query);
            for (k, v) in self.extra_params {
                pairs.append_pair(k, v);
            }
        }
        url.to_string()
    }
}

/// Daraz catalog search.
pub const DARAZ: SiteProfile = SiteProfile {
    source: "Daraz",
    base: "https://www.daraz.lk",
    search_path: "/catalog/",
    query_param: "q",
    extra_params: &[("_keyori", "ss"), ("from", "input")],
    card_selectors: &[
        "div[data-qa-locator='product-item']",
        "div.Bm3ON",
        ".product-item",
    ],
    name_selectors: &[
        "a[data-qa-locator='product-name']",
        "[data-qa-locator='product-name']",
        ".title--wFj93",
        "h3",
        "a[title]",
    ],
    price_selectors: &[
        "span[data-qa-locator='product-price']",
        "[data-qa-locator='product-price']",
        ".currency--GVKjl",
        ".price",
        "span.ooOxS",
    ],
    next_page_selectors: &["li[title='Next Page'] a", "a[aria-label='Next']"],
    keep_sentinel_cards: true,
};

/// MySoftlogic storefront search.
pub const MYSOFTLOGIC: SiteProfile = SiteProfile {
    source: "MySoftlogic",
    base: "https://www.mysoftlogic.lk",
    search_path: "/search",
    query_param: "q",
    extra_params: &[],
    card_selectors: &[".product-grid .grid__item", ".product-item", ".card"],
    name_selectors: &[
        "a[href*='/products/']",
        ".product-title a",
        "a.card__heading",
    ],
    price_selectors: &[".price-item--regular", ".price-item", ".price"],
    next_page_selectors: &["a.pagination__item--next", "a[rel='next']"],
    keep_sentinel_cards: false,
};

/// Singer storefront search.
pub const SINGER: SiteProfile = SiteProfile {
    source: "Singer",
    base: "https://www.singer.lk",
    search_path: "/search",
    query_param: "q",
    extra_params: &[],
    card_selectors: &[".product-item", ".product-grid .item", ".product"],
    name_selectors: &["a[href*='/products/']", ".product-title a", "a"],
    price_selectors: &[".price", ".price-box .price"],
    next_page_selectors: &["a[rel='next']", ".pagination a.next"],
    keep_sentinel_cards: false,
};

/// Abans catalog search.
pub const ABANS: SiteProfile = SiteProfile {
    source: "Abans",
    base: "https://buyabans.com",
    search_path: "/catalogsearch/result/",
    query_param: "q",
    extra_params: &[],
    card_selectors: &[".product-item", ".product", ".item"],
    name_selectors: &[
        "a.product-item-link",
        "a[href*='/smartphones']",
        "a[href*='/product']",
    ],
    price_selectors: &["span.price", ".price"],
    next_page_selectors: &["a.action.next", "a[rel='next']"],
    keep_sentinel_cards: false,
};

/// All built-in retail sources, in invocation order.
pub fn default_profiles() -> Vec<SiteProfile> {
    vec![DARAZ, MYSOFTLOGIC, SINGER, ABANS]
}

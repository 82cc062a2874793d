//! Site adapters: per-retailer extraction profiles and the generic
//! engine that runs them.
//!
//! Adding a retailer means adding a [`SiteProfile`]; the engine in
//! [`engine`] is shared. Adapters are isolated from each other: one
//! failing site contributes an empty list and the run continues.

pub mod engine;
pub mod filters;
pub mod sites;

pub use engine::{scrape_site, ScrapeRequest};
pub use sites::{default_profiles, SiteProfile, ABANS, DARAZ, MYSOFTLOGIC, SINGER};

//! Listing persistence.
//!
//! The store holds one collection of listings per category. Writes
//! are whole-collection replacements: a scrape run's output supersedes
//! whatever was stored before, there are no per-listing updates.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::config::Category;
use crate::types::listing::Listing;

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Per-category listing storage.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Load the stored collection for a category. A category that was
    /// never written loads as an empty collection.
    async fn load(&self, category: Category) -> Result<Vec<Listing>>;

    /// Replace the stored collection for a category.
    async fn replace(&self, category: Category, listings: &[Listing]) -> Result<()>;
}

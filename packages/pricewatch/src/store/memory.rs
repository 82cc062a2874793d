//! In-memory store, for tests and one-shot runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::store::ListingStore;
use crate::types::config::Category;
use crate::types::listing::Listing;

/// Keeps listing collections in a map; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Category, Vec<Listing>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn load(&self, category: Category) -> Result<Vec<Listing>> {
        // Lock poisoning would mean a panicked writer; propagating the
        // poisoned data is fine for a test store.
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        Ok(collections.get(&category).cloned().unwrap_or_default())
    }

    async fn replace(&self, category: Category, listings: &[Listing]) -> Result<()> {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections.insert(category, listings.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::listing;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        let listings = vec![listing("A", "Rs. 1", "https://x/a", "Rs. 2")];
        store.replace(Category::Phones, &listings).await.unwrap();
        assert_eq!(store.load(Category::Phones).await.unwrap(), listings);
        assert!(store.load(Category::Laptops).await.unwrap().is_empty());
    }
}

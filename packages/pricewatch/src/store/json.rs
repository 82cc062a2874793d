//! JSON file store: one pretty-printed JSON array per category.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::store::ListingStore;
use crate::types::config::{Category, StoreLayout};
use crate::types::listing::Listing;

/// Stores each category's listings as a JSON array file under a root
/// directory.
///
/// Replacement is atomic: the new collection is written to a temp file
/// in the same directory and renamed over the target, so a crash
/// mid-write never leaves a truncated store behind.
pub struct JsonFileStore {
    root: PathBuf,
    layout: StoreLayout,
}

impl JsonFileStore {
    /// Create a store rooted at a directory, with the default
    /// category-to-file layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: StoreLayout::default(),
        }
    }

    /// Use a custom category-to-file layout.
    pub fn with_layout(mut self, layout: StoreLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Path of a category's store file.
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.root.join(self.layout.file_for(category))
    }

    fn storage_err(path: &Path, source: std::io::Error) -> PipelineError {
        PipelineError::Storage {
            path: path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl ListingStore for JsonFileStore {
    async fn load(&self, category: Category) -> Result<Vec<Listing>> {
        let path = self.path_for(category);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no store file yet, loading empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::storage_err(&path, e)),
        };
        let listings: Vec<Listing> = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), count = listings.len(), "loaded listings");
        Ok(listings)
    }

    async fn replace(&self, category: Category, listings: &[Listing]) -> Result<()> {
        let path = self.path_for(category);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::storage_err(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(listings)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| Self::storage_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Self::storage_err(&path, e))?;

        info!(path = %path.display(), count = listings.len(), "replaced listing store");
        Ok(())
    }
}

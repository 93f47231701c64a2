//! Item catalog loader.

use std::path::Path;

use crate::catalog::{ItemCatalog, ItemDefinition};
use crate::loaders::{LoadResult, read_file};

/// Loader for the item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item catalog from a RON file.
    ///
    /// RON format: `Vec<ItemDefinition>`; item ids must be unique.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;

        let items: Vec<ItemDefinition> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        ItemCatalog::from_items(items)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog at {}: {}", path.display(), e))
    }
}

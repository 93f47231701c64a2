//! Content factory for building oracle-backing catalogs from data files.

use std::path::{Path, PathBuf};

use crate::catalog::{ItemCatalog, MonsterCatalog, RuleTables, Spellbook};
use crate::loaders::{BalanceLoader, ItemLoader, LoadResult, MonsterLoader, SpellLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── balance.toml
/// ├── bestiary.ron
/// ├── items.ron
/// └── spells.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle tuning and the level table from `balance.toml`.
    pub fn load_balance(&self) -> LoadResult<RuleTables> {
        let path = self.data_dir.join("balance.toml");
        BalanceLoader::load(&path)
    }

    /// Load the monster bestiary from `bestiary.ron`.
    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        let path = self.data_dir.join("bestiary.ron");
        MonsterLoader::load(&path)
    }

    /// Load the spellbook from `spells.ron`.
    pub fn load_spellbook(&self) -> LoadResult<Spellbook> {
        let path = self.data_dir.join("spells.ron");
        SpellLoader::load(&path)
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

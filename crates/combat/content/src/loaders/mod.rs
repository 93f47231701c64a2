//! Content loaders for reading battle data from files.
//!
//! Loaders convert RON/TOML files into the catalogs in [`crate::catalog`],
//! which the runtime then hands to battles through the oracle traits.

pub mod balance;
pub mod factory;
pub mod items;
pub mod monsters;
pub mod spells;

pub use balance::BalanceLoader;
pub use factory::ContentFactory;
pub use items::ItemLoader;
pub use monsters::MonsterLoader;
pub use spells::SpellLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

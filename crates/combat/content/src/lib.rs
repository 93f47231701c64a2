//! Data-driven battle content and loaders.
//!
//! This crate houses static content behind the combat oracles and provides
//! loaders for RON/TOML data files:
//! - Monster bestiary (data-driven via RON)
//! - Spellbook (data-driven via RON)
//! - Item catalog shared with shops (data-driven via RON)
//! - Battle tuning and the level-up table (data-driven via TOML)
//!
//! Content is consumed through the `combat-core` oracle traits and never
//! appears in battle state. A built-in starter set backs tests and demos
//! without touching the filesystem.

pub mod catalog;
pub mod defaults;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{CatalogError, ItemCatalog, ItemDefinition, MonsterCatalog, RuleTables, Spellbook};
pub use defaults::{BuiltinContent, builtin_content};

#[cfg(feature = "loaders")]
pub use loaders::{
    BalanceLoader, ContentFactory, ItemLoader, LoadResult, MonsterLoader, SpellLoader,
};

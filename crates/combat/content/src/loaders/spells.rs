//! Spellbook loader.

use std::path::Path;

use combat_core::Spell;

use crate::catalog::Spellbook;
use crate::loaders::{LoadResult, read_file};

/// Loader for the spellbook from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load the spellbook from a RON file.
    ///
    /// RON format: `Vec<Spell>`; spell ids must be unique.
    pub fn load(path: &Path) -> LoadResult<Spellbook> {
        let content = read_file(path)?;

        let spells: Vec<Spell> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spellbook RON: {}", e))?;

        Spellbook::from_spells(spells)
            .map_err(|e| anyhow::anyhow!("Invalid spellbook at {}: {}", path.display(), e))
    }
}

//! Rule-table oracles: the spellbook and the level table.

use crate::progression::LevelTable;
use crate::state::Spell;

/// Resolves spell ids into full spell definitions.
pub trait SpellbookOracle: Send + Sync {
    fn spell(&self, id: &str) -> Option<Spell>;

    /// Spells whose minimum level equals `level`, granted on reaching it.
    fn spells_unlocked_at(&self, level: u32) -> Vec<Spell>;
}

/// Provides the level-up threshold table.
pub trait LevelTableOracle: Send + Sync {
    fn level_table(&self) -> &LevelTable;
}

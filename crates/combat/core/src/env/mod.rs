//! Traits describing read-only rule and content data.
//!
//! Oracles expose monster templates, the spellbook, the level table, and the
//! random source. The [`CombatEnv`] aggregate bundles them so the engine can
//! reach everything it needs without hard coupling to concrete
//! implementations; each accessor reports a missing oracle as an
//! [`OracleError`] instead of panicking.

mod monsters;
mod rng;
mod tables;

pub use monsters::{MonsterOracle, MonsterTemplate, MonsterTemplateBuilder};
pub use rng::{PcgRng, RngOracle, SequenceRng, compute_seed};
pub use tables::{LevelTableOracle, SpellbookOracle};

/// An oracle the current operation needed was not provided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("rng oracle not available")]
    RngNotAvailable,
    #[error("monster oracle not available")]
    MonstersNotAvailable,
    #[error("spellbook oracle not available")]
    SpellbookNotAvailable,
    #[error("level table oracle not available")]
    LevelTableNotAvailable,
}

/// Aggregates the read-only oracles required by the action pipeline.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    rng: Option<&'a dyn RngOracle>,
    monsters: Option<&'a dyn MonsterOracle>,
    spellbook: Option<&'a dyn SpellbookOracle>,
    levels: Option<&'a dyn LevelTableOracle>,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        rng: Option<&'a dyn RngOracle>,
        monsters: Option<&'a dyn MonsterOracle>,
        spellbook: Option<&'a dyn SpellbookOracle>,
        levels: Option<&'a dyn LevelTableOracle>,
    ) -> Self {
        Self {
            rng,
            monsters,
            spellbook,
            levels,
        }
    }

    pub fn with_all(
        rng: &'a dyn RngOracle,
        monsters: &'a dyn MonsterOracle,
        spellbook: &'a dyn SpellbookOracle,
        levels: &'a dyn LevelTableOracle,
    ) -> Self {
        Self::new(Some(rng), Some(monsters), Some(spellbook), Some(levels))
    }

    /// Environment with only a random source; enough for action resolution.
    pub fn with_rng(rng: &'a dyn RngOracle) -> Self {
        Self::new(Some(rng), None, None, None)
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None)
    }

    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    pub fn monsters(&self) -> Result<&'a dyn MonsterOracle, OracleError> {
        self.monsters.ok_or(OracleError::MonstersNotAvailable)
    }

    pub fn spellbook(&self) -> Result<&'a dyn SpellbookOracle, OracleError> {
        self.spellbook.ok_or(OracleError::SpellbookNotAvailable)
    }

    pub fn levels(&self) -> Result<&'a dyn LevelTableOracle, OracleError> {
        self.levels.ok_or(OracleError::LevelTableNotAvailable)
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("rng", &self.rng.is_some())
            .field("monsters", &self.monsters.is_some())
            .field("spellbook", &self.spellbook.is_some())
            .field("levels", &self.levels.is_some())
            .finish()
    }
}

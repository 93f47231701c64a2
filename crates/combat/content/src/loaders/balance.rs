//! Battle tuning and level table loader.

use std::path::Path;

use combat_core::{BattleConfig, LevelRow, LevelTable};
use serde::Deserialize;

use crate::catalog::RuleTables;
use crate::loaders::{LoadResult, read_file};

/// On-disk shape of the balance file.
#[derive(Debug, Deserialize)]
struct BalanceFile {
    #[serde(default)]
    battle: BattleSection,
    #[serde(default)]
    levels: Vec<LevelRow>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BattleSection {
    escape_threshold: i32,
    defend_bonus: i32,
    crit_multiplier: u32,
}

impl Default for BattleSection {
    fn default() -> Self {
        let config = BattleConfig::default();
        Self {
            escape_threshold: config.escape_threshold,
            defend_bonus: config.defend_bonus,
            crit_multiplier: config.crit_multiplier,
        }
    }
}

/// Loader for battle tuning and the level-up table from TOML files.
pub struct BalanceLoader;

impl BalanceLoader {
    /// Load battle tuning plus the level table from a TOML file.
    ///
    /// Missing `[battle]` keys fall back to the built-in defaults; a missing
    /// `[[levels]]` list yields an empty table (no level-ups).
    pub fn load(path: &Path) -> LoadResult<RuleTables> {
        let content = read_file(path)?;

        let file: BalanceFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;

        Ok(RuleTables {
            config: BattleConfig {
                escape_threshold: file.battle.escape_threshold,
                defend_bonus: file.battle.defend_bonus,
                crit_multiplier: file.battle.crit_multiplier,
            },
            levels: LevelTable::new(file.levels),
        })
    }
}

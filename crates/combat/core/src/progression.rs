//! Reward application and level progression.
//!
//! On victory the runtime hands the battle spoils to [`apply_rewards`], which
//! mutates the persistent [`Progression`] record: gold and XP first, then a
//! cascade of level-ups for as long as the next threshold is met. One large
//! XP award can cross several levels in a single call; each level's grants
//! (HP growth, stat gains, spell unlocks) apply exactly once.

use std::collections::BTreeSet;

use crate::env::SpellbookOracle;

/// Persistent progression state of the party member.
///
/// Level is monotonically non-decreasing; spell grants use set semantics so
/// re-deriving a level-up can never double-grant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub level: u32,
    /// Cumulative experience.
    pub xp: u64,
    pub gold: u64,
    /// Current HP; persists between battles.
    pub hp: u32,
    pub hp_max: u32,
    pub attack_bonus: i32,
    pub armor_class: i32,
    pub known_spells: BTreeSet<String>,
}

impl Progression {
    /// A fresh level-1 record at full HP.
    pub fn starting(hp_max: u32, attack_bonus: i32, armor_class: i32) -> Self {
        Self {
            level: 1,
            xp: 0,
            gold: 0,
            hp: hp_max,
            hp_max,
            attack_bonus,
            armor_class,
            known_spells: BTreeSet::new(),
        }
    }
}

/// One level's entry in the progression table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelRow {
    pub level: u32,
    /// Cumulative XP required to reach this level.
    pub xp_threshold: u64,
    pub hp_gain: u32,
    pub attack_gain: i32,
    pub ac_gain: i32,
}

/// Level-up table, ordered by level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelTable {
    rows: Vec<LevelRow>,
}

impl LevelTable {
    pub fn new(mut rows: Vec<LevelRow>) -> Self {
        rows.sort_by_key(|row| row.level);
        Self { rows }
    }

    pub fn rows(&self) -> &[LevelRow] {
        &self.rows
    }

    /// The row for the level following `level`, if the table goes that far.
    pub fn next_after(&self, level: u32) -> Option<&LevelRow> {
        self.rows.iter().find(|row| row.level == level + 1)
    }
}

/// What a reward application actually granted, for logs and UI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardReport {
    pub xp_gained: u32,
    pub gold_gained: u32,
    /// Levels reached, in order.
    pub levels_gained: Vec<u32>,
    /// Spell ids newly learned.
    pub spells_unlocked: Vec<String>,
}

impl RewardReport {
    pub fn leveled_up(&self) -> bool {
        !self.levels_gained.is_empty()
    }
}

/// Apply battle spoils: add gold, add XP, then cascade level-ups while the
/// next level's cumulative threshold is met or the table runs out.
///
/// Each level-up raises max HP and heals current HP by the same amount
/// (clamped to the new max), adds the row's stat gains, and unions in every
/// spell whose minimum level equals the new level.
pub fn apply_rewards(
    progression: &mut Progression,
    xp: u32,
    gold: u32,
    table: &LevelTable,
    spellbook: &(impl SpellbookOracle + ?Sized),
) -> RewardReport {
    let mut report = RewardReport {
        xp_gained: xp,
        gold_gained: gold,
        ..RewardReport::default()
    };

    progression.gold += gold as u64;
    progression.xp += xp as u64;

    while let Some(next) = table.next_after(progression.level) {
        if progression.xp < next.xp_threshold {
            break;
        }

        progression.level = next.level;
        progression.hp_max += next.hp_gain;
        progression.hp = (progression.hp + next.hp_gain).min(progression.hp_max);
        progression.attack_bonus += next.attack_gain;
        progression.armor_class += next.ac_gain;
        report.levels_gained.push(next.level);

        for spell in spellbook.spells_unlocked_at(next.level) {
            // Set semantics: re-learning an already-known spell is a no-op.
            if progression.known_spells.insert(spell.id.clone()) {
                report.spells_unlocked.push(spell.id);
            }
        }
    }

    report
}

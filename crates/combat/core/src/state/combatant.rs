//! Combatant model - normalized view of a party member or monster.
//!
//! Party members and monster templates have different source shapes; both
//! flatten into [`Combatant`] snapshots owned by the battle session, so the
//! action resolver never cares which side a unit came from.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::inventory::Inventory;

/// Identifies a combatant within one battle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// The active party member. Enemies start at 1.
    pub const PLAYER: CombatantId = CombatantId(0);
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the battle a combatant fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Party,
    Enemy,
}

/// Stat keys used as spell modifiers and roll bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKey {
    Strength,
    Dexterity,
    Intelligence,
    Wisdom,
}

/// Flat stat modifiers, looked up by [`StatKey`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifiers {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub wisdom: i32,
}

impl StatModifiers {
    pub fn get(&self, key: StatKey) -> i32 {
        match key {
            StatKey::Strength => self.strength,
            StatKey::Dexterity => self.dexterity,
            StatKey::Intelligence => self.intelligence,
            StatKey::Wisdom => self.wisdom,
        }
    }
}

/// Hit point meter. Every mutation clamps current HP to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpMeter {
    current: u32,
    max: u32,
}

impl HpMeter {
    pub const fn at_max(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, flooring at 0. Returns the HP actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Restore HP, clamped to max. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }

    /// Raise the maximum and heal by the same amount (level-up growth).
    pub fn grow(&mut self, amount: u32) {
        self.max += amount;
        self.current = (self.current + amount).min(self.max);
    }
}

/// What a spell does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    /// Direct damage; bypasses the to-hit roll.
    Damage,
    /// Restores HP on the caster's side.
    Heal,
}

/// A castable spell or skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub effect: SpellEffect,
    /// Dice notation for the damage or heal amount.
    pub dice: String,
    /// Stat modifier added to the roll, if any.
    pub modifier: Option<StatKey>,
    /// Minimum caster level.
    pub min_level: u32,
}

/// One side's fighting unit: a snapshot owned by the battle session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    /// Boss fights cannot be fled or escaped from.
    pub boss: bool,

    pub hp: HpMeter,
    /// Added to the d20 attack roll.
    pub attack_bonus: i32,
    /// Threshold an incoming attack roll must meet or exceed.
    pub armor_class: i32,
    /// Flat bonus added to weapon damage rolls.
    pub damage_modifier: i32,
    /// Added to the opening initiative roll.
    pub initiative_modifier: i32,
    pub speed: i32,
    pub level: u32,
    pub stats: StatModifiers,

    /// Weapon damage dice notation.
    pub weapon_dice: String,
    pub spells: ArrayVec<Spell, { BattleConfig::MAX_SPELLS }>,
    pub inventory: Inventory,

    /// Temporary AC bonus from the defend stance; cleared at the start of
    /// this combatant's next turn.
    pub defend_bonus: i32,

    // Enemy-side bookkeeping for the victory summary.
    /// Species id of the template this enemy was cloned from.
    pub species: Option<String>,
    pub xp_reward: u32,
    pub gold_reward: u32,
    pub drops: Vec<String>,
    /// Set once a party attack lands, meaning the AC was empirically probed.
    pub ac_discovered: bool,
}

impl Combatant {
    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }

    /// Armor class including the transient defend bonus.
    pub fn effective_ac(&self) -> i32 {
        self.armor_class + self.defend_bonus
    }

    /// Look up a known spell by id.
    pub fn spell(&self, spell_id: &str) -> Option<&Spell> {
        self.spells.iter().find(|s| s.id == spell_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_meter_clamps_both_ways() {
        let mut hp = HpMeter::at_max(20);
        assert_eq!(hp.damage(50), 20);
        assert!(hp.is_depleted());
        assert_eq!(hp.heal(100), 20);
        assert_eq!(hp.current(), 20);
    }

    #[test]
    fn grow_raises_max_and_heals() {
        let mut hp = HpMeter::new(5, 20);
        hp.grow(4);
        assert_eq!(hp.max(), 24);
        assert_eq!(hp.current(), 9);
    }

    #[test]
    fn stat_key_parses_snake_case() {
        use core::str::FromStr;
        assert_eq!(StatKey::from_str("strength"), Ok(StatKey::Strength));
        assert_eq!(StatKey::Dexterity.to_string(), "dexterity");
    }
}

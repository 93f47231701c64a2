//! Persistent party member record.
//!
//! The surrounding game session owns exactly one [`PartyMember`] per hero.
//! The combat core only references it: a battle opens with a [`Combatant`]
//! snapshot built from the record, and writes HP and inventory back when the
//! session closes. XP/gold/level mutations go through the reward engine.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::SpellbookOracle;
use crate::progression::Progression;
use crate::state::combatant::{Combatant, CombatantId, HpMeter, Side, Spell, StatModifiers};
use crate::state::inventory::Inventory;

/// The persistent party member, owned by the game session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub name: String,
    /// Level, XP, gold, HP, and known spells all live here and survive
    /// between battles.
    pub progression: Progression,
    pub damage_modifier: i32,
    pub initiative_modifier: i32,
    pub speed: i32,
    pub stats: StatModifiers,
    pub weapon_dice: String,
    pub inventory: Inventory,
}

impl PartyMember {
    /// Build the battle snapshot. Known spell ids resolve through the
    /// spellbook; ids the spellbook no longer carries are skipped.
    pub fn to_combatant(&self, spellbook: &(impl SpellbookOracle + ?Sized)) -> Combatant {
        let mut spells: ArrayVec<Spell, { BattleConfig::MAX_SPELLS }> = ArrayVec::new();
        for id in self.progression.known_spells.iter() {
            if spells.is_full() {
                break;
            }
            if let Some(spell) = spellbook.spell(id) {
                spells.push(spell);
            }
        }

        Combatant {
            id: CombatantId::PLAYER,
            name: self.name.clone(),
            side: Side::Party,
            boss: false,
            hp: HpMeter::new(self.progression.hp, self.progression.hp_max),
            attack_bonus: self.progression.attack_bonus,
            armor_class: self.progression.armor_class,
            damage_modifier: self.damage_modifier,
            initiative_modifier: self.initiative_modifier,
            speed: self.speed,
            level: self.progression.level,
            stats: self.stats,
            weapon_dice: self.weapon_dice.clone(),
            spells,
            inventory: self.inventory.clone(),
            defend_bonus: 0,
            species: None,
            xp_reward: 0,
            gold_reward: 0,
            drops: Vec::new(),
            ac_discovered: false,
        }
    }

    /// Write battle results back from the snapshot: current HP and whatever
    /// the inventory looks like after item consumption.
    pub fn write_back(&mut self, snapshot: &Combatant) {
        self.progression.hp = snapshot.hp.current().min(self.progression.hp_max);
        self.inventory = snapshot.inventory.clone();
    }
}

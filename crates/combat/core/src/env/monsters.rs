//! Monster template definitions and oracle interface.
//!
//! Templates describe monsters in a data-driven way and spawn per-encounter
//! [`Combatant`] snapshots, so repeated encounters never share mutable state.
//! The [`MonsterOracle`] trait lets exploration resolve a species id plus the
//! current biome into a template without coupling to concrete content.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::{
    Combatant, CombatantId, HpMeter, Inventory, Side, Spell, StatModifiers,
};

/// Resolves species ids to monster templates.
///
/// `biome` scopes the lookup: a species may only exist in some biomes, or
/// carry biome-specific tuning. Implementations return `None` for unknown
/// species or a species that does not spawn in the given biome.
pub trait MonsterOracle: Send + Sync {
    fn template(&self, species: &str, biome: &str) -> Option<MonsterTemplate>;
}

/// Monster template defining all Combatant fields except the battle-local id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub species: String,
    pub name: String,
    pub boss: bool,
    pub hp_max: u32,
    pub attack_bonus: i32,
    pub armor_class: i32,
    pub damage_modifier: i32,
    pub initiative_modifier: i32,
    pub speed: i32,
    pub level: u32,
    pub stats: StatModifiers,
    pub weapon_dice: String,
    pub spells: Vec<Spell>,
    /// Biome tags this species spawns in; empty means anywhere.
    pub biomes: Vec<String>,
    pub xp_reward: u32,
    pub gold_reward: u32,
    /// Item ids dropped on defeat.
    pub drops: Vec<String>,
}

impl MonsterTemplate {
    pub fn builder(species: impl Into<String>, name: impl Into<String>) -> MonsterTemplateBuilder {
        MonsterTemplateBuilder::new(species, name)
    }

    /// Whether this species spawns in the given biome.
    pub fn spawns_in(&self, biome: &str) -> bool {
        self.biomes.is_empty() || self.biomes.iter().any(|b| b == biome)
    }

    /// Clone a fresh enemy-side combatant snapshot for a battle.
    pub fn spawn(&self, id: CombatantId) -> Combatant {
        let mut spells: ArrayVec<Spell, { BattleConfig::MAX_SPELLS }> = ArrayVec::new();
        for spell in self.spells.iter().take(BattleConfig::MAX_SPELLS) {
            spells.push(spell.clone());
        }

        Combatant {
            id,
            name: self.name.clone(),
            side: Side::Enemy,
            boss: self.boss,
            hp: HpMeter::at_max(self.hp_max),
            attack_bonus: self.attack_bonus,
            armor_class: self.armor_class,
            damage_modifier: self.damage_modifier,
            initiative_modifier: self.initiative_modifier,
            speed: self.speed,
            level: self.level,
            stats: self.stats,
            weapon_dice: self.weapon_dice.clone(),
            spells,
            inventory: Inventory::default(),
            defend_bonus: 0,
            species: Some(self.species.clone()),
            xp_reward: self.xp_reward,
            gold_reward: self.gold_reward,
            drops: self.drops.clone(),
            ac_discovered: false,
        }
    }
}

/// Builder for constructing monster templates.
pub struct MonsterTemplateBuilder {
    template: MonsterTemplate,
}

impl MonsterTemplateBuilder {
    pub fn new(species: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            template: MonsterTemplate {
                species: species.into(),
                name: name.into(),
                boss: false,
                hp_max: 10,
                attack_bonus: 2,
                armor_class: 10,
                damage_modifier: 0,
                initiative_modifier: 0,
                speed: 3,
                level: 1,
                stats: StatModifiers::default(),
                weapon_dice: "1d6".into(),
                spells: Vec::new(),
                biomes: Vec::new(),
                xp_reward: 10,
                gold_reward: 5,
                drops: Vec::new(),
            },
        }
    }

    pub fn boss(mut self, boss: bool) -> Self {
        self.template.boss = boss;
        self
    }

    pub fn hp(mut self, hp_max: u32) -> Self {
        self.template.hp_max = hp_max;
        self
    }

    pub fn attack(mut self, attack_bonus: i32) -> Self {
        self.template.attack_bonus = attack_bonus;
        self
    }

    pub fn armor_class(mut self, armor_class: i32) -> Self {
        self.template.armor_class = armor_class;
        self
    }

    pub fn damage_modifier(mut self, damage_modifier: i32) -> Self {
        self.template.damage_modifier = damage_modifier;
        self
    }

    pub fn initiative(mut self, initiative_modifier: i32) -> Self {
        self.template.initiative_modifier = initiative_modifier;
        self
    }

    pub fn speed(mut self, speed: i32) -> Self {
        self.template.speed = speed;
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.template.level = level;
        self
    }

    pub fn weapon(mut self, dice: impl Into<String>) -> Self {
        self.template.weapon_dice = dice.into();
        self
    }

    pub fn spell(mut self, spell: Spell) -> Self {
        self.template.spells.push(spell);
        self
    }

    pub fn biome(mut self, biome: impl Into<String>) -> Self {
        self.template.biomes.push(biome.into());
        self
    }

    pub fn rewards(mut self, xp: u32, gold: u32) -> Self {
        self.template.xp_reward = xp;
        self.template.gold_reward = gold;
        self
    }

    pub fn drop_item(mut self, item_id: impl Into<String>) -> Self {
        self.template.drops.push(item_id.into());
        self
    }

    pub fn build(self) -> MonsterTemplate {
        self.template
    }
}

//! Built-in starter content.
//!
//! A small self-consistent content set used by tests, demos, and as a
//! fallback when no data directory is configured. Data files loaded through
//! [`crate::loaders`] replace this wholesale.

use combat_core::{
    BattleConfig, ItemEffect, LevelRow, LevelTable, MonsterTemplate, Spell, SpellEffect, StatKey,
};

use crate::catalog::{ItemCatalog, ItemDefinition, MonsterCatalog, RuleTables, Spellbook};

/// The full built-in content set.
pub struct BuiltinContent {
    pub monsters: MonsterCatalog,
    pub spellbook: Spellbook,
    pub items: ItemCatalog,
    pub tables: RuleTables,
}

/// Assemble the starter bestiary, spellbook, item catalog, and rule tables.
pub fn builtin_content() -> BuiltinContent {
    BuiltinContent {
        monsters: builtin_monsters(),
        spellbook: builtin_spellbook(),
        items: builtin_items(),
        tables: builtin_tables(),
    }
}

fn builtin_monsters() -> MonsterCatalog {
    let templates = vec![
        MonsterTemplate::builder("slime", "Slime")
            .hp(8)
            .attack(1)
            .armor_class(10)
            .weapon("1d4")
            .rewards(15, 6)
            .build(),
        MonsterTemplate::builder("goblin", "Goblin")
            .hp(12)
            .attack(2)
            .armor_class(12)
            .damage_modifier(1)
            .weapon("1d6")
            .biome("cave")
            .biome("forest")
            .rewards(25, 10)
            .drop_item("small_fang")
            .build(),
        MonsterTemplate::builder("wolf", "Wolf")
            .hp(14)
            .attack(3)
            .armor_class(13)
            .initiative(2)
            .speed(6)
            .weapon("1d6")
            .biome("forest")
            .rewards(35, 8)
            .build(),
        MonsterTemplate::builder("cave_troll", "Cave Troll")
            .boss(true)
            .hp(42)
            .attack(5)
            .armor_class(15)
            .damage_modifier(3)
            .level(4)
            .weapon("2d6")
            .biome("cave")
            .rewards(200, 120)
            .drop_item("troll_hide")
            .build(),
    ];
    // The built-in set has no duplicate species.
    MonsterCatalog::from_templates(templates).unwrap_or_default()
}

fn builtin_spellbook() -> Spellbook {
    let spells = vec![
        Spell {
            id: "spark".into(),
            name: "Spark".into(),
            effect: SpellEffect::Damage,
            dice: "1d8".into(),
            modifier: Some(StatKey::Intelligence),
            min_level: 2,
        },
        Spell {
            id: "mend".into(),
            name: "Mend".into(),
            effect: SpellEffect::Heal,
            dice: "1d8".into(),
            modifier: Some(StatKey::Wisdom),
            min_level: 3,
        },
        Spell {
            id: "fireball".into(),
            name: "Fireball".into(),
            effect: SpellEffect::Damage,
            dice: "3d6".into(),
            modifier: Some(StatKey::Intelligence),
            min_level: 5,
        },
    ];
    Spellbook::from_spells(spells).unwrap_or_default()
}

fn builtin_items() -> ItemCatalog {
    let items = vec![
        ItemDefinition {
            id: "potion".into(),
            name: "Potion".into(),
            effect: ItemEffect::Heal,
            dice: "2d4+2".into(),
            price: 50,
        },
        ItemDefinition {
            id: "bomb".into(),
            name: "Bomb".into(),
            effect: ItemEffect::Damage,
            dice: "2d6".into(),
            price: 80,
        },
        ItemDefinition {
            id: "smoke_ball".into(),
            name: "Smoke Ball".into(),
            effect: ItemEffect::Escape,
            dice: String::new(),
            price: 30,
        },
    ];
    ItemCatalog::from_items(items).unwrap_or_default()
}

fn builtin_tables() -> RuleTables {
    RuleTables {
        config: BattleConfig::default(),
        levels: LevelTable::new(vec![
            LevelRow {
                level: 2,
                xp_threshold: 60,
                hp_gain: 4,
                attack_gain: 1,
                ac_gain: 0,
            },
            LevelRow {
                level: 3,
                xp_threshold: 140,
                hp_gain: 4,
                attack_gain: 0,
                ac_gain: 1,
            },
            LevelRow {
                level: 4,
                xp_threshold: 260,
                hp_gain: 5,
                attack_gain: 1,
                ac_gain: 0,
            },
            LevelRow {
                level: 5,
                xp_threshold: 420,
                hp_gain: 5,
                attack_gain: 1,
                ac_gain: 1,
            },
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{MonsterOracle, SpellbookOracle};

    #[test]
    fn starter_set_is_self_consistent() {
        let content = builtin_content();

        // Every drop id resolves in the item catalog or is a trophy-only id.
        assert!(!content.monsters.is_empty());
        assert!(content.items.get("potion").is_some());

        // Spell unlock levels all sit inside the level table's range.
        let unlocked = content.spellbook.spells_unlocked_at(2);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "spark");
    }

    #[test]
    fn boss_template_is_flagged() {
        let content = builtin_content();
        let troll = content.monsters.template("cave_troll", "cave").unwrap();
        assert!(troll.boss);
        assert!(content.monsters.template("cave_troll", "forest").is_none());
    }
}

//! In-memory content catalogs backing the combat oracles.
//!
//! Catalogs are immutable once built. Loaders (or the built-in starter set)
//! construct them, and the runtime hands them to battles through the oracle
//! traits in `combat-core`.

use std::collections::HashMap;

use combat_core::{
    BattleConfig, ItemEffect, ItemStack, LevelTable, LevelTableOracle, MonsterOracle,
    MonsterTemplate, Spell, SpellbookOracle,
};

/// Errors raised while assembling a catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate monster species '{0}'")]
    DuplicateSpecies(String),

    #[error("duplicate spell id '{0}'")]
    DuplicateSpell(String),

    #[error("duplicate item id '{0}'")]
    DuplicateItem(String),
}

/// Bestiary of monster templates, keyed by species id.
#[derive(Clone, Debug, Default)]
pub struct MonsterCatalog {
    templates: HashMap<String, MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn from_templates(templates: Vec<MonsterTemplate>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(templates.len());
        for template in templates {
            let species = template.species.clone();
            if map.insert(species.clone(), template).is_some() {
                return Err(CatalogError::DuplicateSpecies(species));
            }
        }
        Ok(Self { templates: map })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All species that spawn in the given biome, sorted for determinism.
    pub fn species_in_biome(&self, biome: &str) -> Vec<&MonsterTemplate> {
        let mut found: Vec<_> = self
            .templates
            .values()
            .filter(|t| t.spawns_in(biome))
            .collect();
        found.sort_by(|a, b| a.species.cmp(&b.species));
        found
    }
}

impl MonsterOracle for MonsterCatalog {
    fn template(&self, species: &str, biome: &str) -> Option<MonsterTemplate> {
        self.templates
            .get(species)
            .filter(|t| t.spawns_in(biome))
            .cloned()
    }
}

/// Spell definitions keyed by spell id.
#[derive(Clone, Debug, Default)]
pub struct Spellbook {
    spells: HashMap<String, Spell>,
}

impl Spellbook {
    pub fn from_spells(spells: Vec<Spell>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(spells.len());
        for spell in spells {
            let id = spell.id.clone();
            if map.insert(id.clone(), spell).is_some() {
                return Err(CatalogError::DuplicateSpell(id));
            }
        }
        Ok(Self { spells: map })
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellbookOracle for Spellbook {
    fn spell(&self, id: &str) -> Option<Spell> {
        self.spells.get(id).cloned()
    }

    fn spells_unlocked_at(&self, level: u32) -> Vec<Spell> {
        let mut unlocked: Vec<_> = self
            .spells
            .values()
            .filter(|s| s.min_level == level)
            .cloned()
            .collect();
        // Sorted so grants land in a stable order regardless of hashing.
        unlocked.sort_by(|a, b| a.id.cmp(&b.id));
        unlocked
    }
}

/// Item definition shared by combat inventories and shops.
///
/// The battle side only sees [`ItemStack`] snapshots; the price stays a
/// content-layer concern.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub effect: ItemEffect,
    /// Dice notation for the item's heal or damage roll. Ignored for
    /// escape items.
    #[serde(default)]
    pub dice: String,
    /// Shop price in gold.
    #[serde(default)]
    pub price: u32,
}

impl ItemDefinition {
    /// Build an inventory stack of `quantity` copies.
    pub fn to_stack(&self, quantity: u32) -> ItemStack {
        ItemStack {
            id: self.id.clone(),
            name: self.name.clone(),
            effect: self.effect,
            dice: self.dice.clone(),
            quantity,
        }
    }
}

/// Item catalog keyed by item id.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDefinition>,
}

impl ItemCatalog {
    pub fn from_items(items: Vec<ItemDefinition>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(items.len());
        for item in items {
            let id = item.id.clone();
            if map.insert(id.clone(), item).is_some() {
                return Err(CatalogError::DuplicateItem(id));
            }
        }
        Ok(Self { items: map })
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Build an inventory stack for a known item id.
    pub fn stack(&self, id: &str, quantity: u32) -> Option<ItemStack> {
        self.items.get(id).map(|item| item.to_stack(quantity))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Battle tuning plus the level-up table, loaded together from one file.
#[derive(Clone, Debug, Default)]
pub struct RuleTables {
    pub config: BattleConfig,
    pub levels: LevelTable,
}

impl LevelTableOracle for RuleTables {
    fn level_table(&self) -> &LevelTable {
        &self.levels
    }
}

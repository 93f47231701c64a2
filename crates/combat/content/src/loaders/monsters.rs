//! Bestiary loader.
//!
//! Loads monster templates from RON files into a [`MonsterCatalog`].

use std::path::Path;

use combat_core::MonsterTemplate;

use crate::catalog::MonsterCatalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for the monster bestiary from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    /// Load the bestiary from a RON file.
    ///
    /// RON format: `Vec<MonsterTemplate>`; species ids must be unique.
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        let content = read_file(path)?;

        let templates: Vec<MonsterTemplate> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bestiary RON: {}", e))?;

        MonsterCatalog::from_templates(templates)
            .map_err(|e| anyhow::anyhow!("Invalid bestiary at {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::MonsterOracle;
    use std::io::Write;

    const BESTIARY: &str = r#"[
    (
        species: "goblin",
        name: "Goblin",
        boss: false,
        hp_max: 12,
        attack_bonus: 2,
        armor_class: 12,
        damage_modifier: 1,
        initiative_modifier: 0,
        speed: 3,
        level: 1,
        stats: (strength: 1, dexterity: 1, intelligence: 0, wisdom: 0),
        weapon_dice: "1d6",
        spells: [],
        biomes: ["cave"],
        xp_reward: 25,
        gold_reward: 10,
        drops: ["small_fang"],
    ),
]"#;

    #[test]
    fn loads_bestiary_from_ron() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BESTIARY.as_bytes()).unwrap();

        let catalog = MonsterLoader::load(file.path()).unwrap();
        let goblin = catalog.template("goblin", "cave").unwrap();
        assert_eq!(goblin.hp_max, 12);
        assert_eq!(goblin.drops, vec!["small_fang".to_string()]);
        assert!(catalog.template("goblin", "beach").is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = MonsterLoader::load(Path::new("/nonexistent/bestiary.ron")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}

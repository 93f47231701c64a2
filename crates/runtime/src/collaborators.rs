//! External collaborators notified by the runtime.

use async_trait::async_trait;

use combat_core::DefeatedMonster;

/// One bestiary entry produced by a victorious battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestiaryNote {
    pub species: String,
    pub name: String,
    /// True if at least one party attack landed, so the armor class can be
    /// shown in the bestiary.
    pub ac_discovered: bool,
    /// Item ids the monster dropped.
    pub drops: Vec<String>,
}

impl From<&DefeatedMonster> for BestiaryNote {
    fn from(defeated: &DefeatedMonster) -> Self {
        Self {
            species: defeated.species.clone(),
            name: defeated.name.clone(),
            ac_discovered: defeated.ac_discovered,
            drops: defeated.drops.clone(),
        }
    }
}

/// Receives defeat notifications after a victory.
///
/// The runtime notifies the sink once per defeated monster, after rewards
/// have been applied. Implementations typically update a bestiary screen or
/// a completion tracker.
#[async_trait]
pub trait BestiarySink: Send + Sync {
    async fn record(&self, note: BestiaryNote);
}

/// In-memory sink collecting notes; useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryBestiary {
    notes: std::sync::Mutex<Vec<BestiaryNote>>,
}

impl MemoryBestiary {
    pub fn notes(&self) -> Vec<BestiaryNote> {
        self.notes.lock().expect("bestiary lock poisoned").clone()
    }
}

#[async_trait]
impl BestiarySink for MemoryBestiary {
    async fn record(&self, note: BestiaryNote) {
        self.notes.lock().expect("bestiary lock poisoned").push(note);
    }
}

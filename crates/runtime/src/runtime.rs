//! High-level battle orchestrator.
//!
//! The runtime owns the battle worker, wires up the command/event channels,
//! and exposes a builder-based API for clients to open an encounter. The
//! worker drives enemy turns on a pacing timer; clients submit player actions
//! and observe events through [`BattleHandle`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_core::{BattleSession, CombatantId, MonsterOracle, PartyMember, PcgRng, RngOracle};
use combat_content::{ItemCatalog, MonsterCatalog, RuleTables, Spellbook, builtin_content};

use crate::collaborators::BestiarySink;
use crate::error::{Result, RuntimeError};
use crate::event::BattleEvent;
use crate::handle::BattleHandle;
use crate::worker::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pause before each automatic enemy action, so clients can narrate.
    pub enemy_delay: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enemy_delay: Duration::from_millis(600),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// What to fight and where.
#[derive(Debug, Clone)]
pub struct EncounterSpec {
    pub biome: String,
    /// Species ids to spawn, in turn-order-insertion order.
    pub species: Vec<String>,
}

impl EncounterSpec {
    pub fn new(biome: impl Into<String>, species: Vec<String>) -> Self {
        Self {
            biome: biome.into(),
            species,
        }
    }
}

/// Main runtime that orchestrates one battle.
///
/// Design: the runtime owns the worker; [`BattleHandle`] provides a
/// cloneable facade for clients.
#[derive(Debug)]
pub struct BattleRuntime {
    handle: BattleHandle,
    party: Arc<Mutex<PartyMember>>,
    worker_handle: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder.
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this battle.
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Subscribe to battle events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<BattleEvent> {
        self.handle.subscribe_events()
    }

    /// The shared persistent party record. Rewards and write-backs land here
    /// when the battle ends.
    pub fn party(&self) -> Arc<Mutex<PartyMember>> {
        Arc::clone(&self.party)
    }

    /// Shutdown the runtime gracefully.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    monsters: Option<MonsterCatalog>,
    spellbook: Option<Spellbook>,
    items: Option<ItemCatalog>,
    tables: Option<RuleTables>,
    rng: Option<Box<dyn RngOracle>>,
    party: Option<PartyMember>,
    bestiary: Option<Arc<dyn BestiarySink>>,
    encounter: Option<EncounterSpec>,
    seed: Option<u64>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            monsters: None,
            spellbook: None,
            items: None,
            tables: None,
            rng: None,
            party: None,
            bestiary: None,
            encounter: None,
            seed: None,
        }
    }

    /// Override runtime configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the bestiary of monster templates.
    pub fn monsters(mut self, monsters: MonsterCatalog) -> Self {
        self.monsters = Some(monsters);
        self
    }

    /// Set the spellbook.
    pub fn spellbook(mut self, spellbook: Spellbook) -> Self {
        self.spellbook = Some(spellbook);
        self
    }

    /// Set the item catalog used to resolve drops.
    pub fn items(mut self, items: ItemCatalog) -> Self {
        self.items = Some(items);
        self
    }

    /// Set battle tuning and the level table.
    pub fn tables(mut self, tables: RuleTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Override the random source (defaults to [`PcgRng`]).
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Set the persistent party member entering the battle. Required.
    pub fn party(mut self, party: PartyMember) -> Self {
        self.party = Some(party);
        self
    }

    /// Set the bestiary sink notified on victory (optional).
    pub fn bestiary(mut self, sink: Arc<dyn BestiarySink>) -> Self {
        self.bestiary = Some(sink);
        self
    }

    /// Set the encounter to fight. Required.
    pub fn encounter(mut self, encounter: EncounterSpec) -> Self {
        self.encounter = Some(encounter);
        self
    }

    /// Fix the battle seed (defaults to a random one).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the runtime and open the battle.
    pub async fn build(self) -> Result<BattleRuntime> {
        let defaults = builtin_content();
        let monsters = self.monsters.unwrap_or(defaults.monsters);
        let spellbook = self.spellbook.unwrap_or(defaults.spellbook);
        let items = self.items.unwrap_or(defaults.items);
        let tables = self.tables.unwrap_or(defaults.tables);
        let rng = self.rng.unwrap_or_else(|| Box::new(PcgRng));

        let member = self.party.ok_or(RuntimeError::MissingParty)?;
        let encounter = self.encounter.ok_or(RuntimeError::EmptyEncounter)?;
        if encounter.species.is_empty() {
            return Err(RuntimeError::EmptyEncounter);
        }

        let mut combatants = vec![member.to_combatant(&spellbook)];
        let mut enemy_names = Vec::with_capacity(encounter.species.len());
        for (index, species) in encounter.species.iter().enumerate() {
            let template = monsters
                .template(species, &encounter.biome)
                .ok_or_else(|| RuntimeError::UnknownSpecies {
                    species: species.clone(),
                    biome: encounter.biome.clone(),
                })?;
            enemy_names.push(template.name.clone());
            combatants.push(template.spawn(CombatantId(index as u32 + 1)));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let session = BattleSession::new(seed, tables.config.clone(), combatants);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) =
            broadcast::channel::<BattleEvent>(self.config.event_buffer_size);

        let handle = BattleHandle::new(command_tx, event_tx.clone());
        let party = Arc::new(Mutex::new(member));

        let mut worker = BattleWorker::new(
            session,
            rng,
            monsters,
            spellbook,
            items,
            tables,
            Arc::clone(&party),
            self.bestiary,
            command_rx,
            event_tx.clone(),
            self.config.enemy_delay,
        );
        let lines = worker.open().await?;
        let _ = event_tx.send(BattleEvent::BattleStarted {
            seed,
            enemies: enemy_names,
            lines,
        });

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(BattleRuntime {
            handle,
            party,
            worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        Action, ActionKind, AttackAction, BattlePhase, Progression, SequenceRng, StatModifiers,
    };
    use combat_core::Inventory;
    use tokio::time::timeout;

    use crate::collaborators::MemoryBestiary;

    fn hero() -> PartyMember {
        PartyMember {
            name: "Aria".into(),
            progression: Progression::starting(20, 4, 14),
            damage_modifier: 2,
            initiative_modifier: 1,
            speed: 5,
            stats: StatModifiers::default(),
            weapon_dice: "1d8".into(),
            inventory: Inventory::default(),
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("battle_runtime=debug")
            .with_test_writer()
            .try_init();
    }

    fn fast_config() -> RuntimeConfig {
        RuntimeConfig {
            enemy_delay: Duration::from_millis(10),
            ..RuntimeConfig::default()
        }
    }

    async fn wait_for(
        events: &mut broadcast::Receiver<BattleEvent>,
        mut pred: impl FnMut(&BattleEvent) -> bool,
    ) -> BattleEvent {
        timeout(Duration::from_secs(5), async {
            loop {
                let event = events.recv().await.expect("event channel closed");
                if pred(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("timed out waiting for event")
    }

    #[tokio::test]
    async fn scripted_battle_runs_to_victory_and_applies_rewards() {
        init_tracing();
        // Faces: initiative (player 10+1, goblin 5), player hit 15+4 vs AC 12
        // for 6+2 damage, goblin miss 3+2 vs AC 14, player hit 15 for 2+2.
        let rng = SequenceRng::from_faces([10, 5, 15, 6, 3, 15, 2]);
        let bestiary = Arc::new(MemoryBestiary::default());

        let runtime = BattleRuntime::builder()
            .config(fast_config())
            .party(hero())
            .encounter(EncounterSpec::new("cave", vec!["goblin".into()]))
            .rng(rng)
            .seed(7)
            .bestiary(bestiary.clone())
            .build()
            .await
            .unwrap();

        let handle = runtime.handle();
        let mut events = runtime.subscribe_events();

        let view = handle.view().await.unwrap();
        assert_eq!(view.phase, BattlePhase::AwaitingPlayerAction);
        assert!(view.available.contains(&ActionKind::Attack));

        let attack = Action::Attack(AttackAction::new(CombatantId::PLAYER, CombatantId(1)));
        let report = handle.execute_action(attack.clone()).await.unwrap();
        assert!(report.lines[0].contains("hits Goblin for 8 damage"));

        // The enemy turn fires from the pacing timer; wait for the machine
        // to hand the turn back.
        wait_for(&mut events, |e| {
            matches!(
                e,
                BattleEvent::PhaseChanged {
                    phase: BattlePhase::AwaitingPlayerAction
                }
            )
        })
        .await;

        let report = handle.execute_action(attack).await.unwrap();
        assert!(report.lines.iter().any(|l| l == "Victory!"));

        let ended = wait_for(&mut events, |e| {
            matches!(e, BattleEvent::BattleEnded { .. })
        })
        .await;
        let BattleEvent::BattleEnded { phase, summary } = ended else {
            unreachable!()
        };
        assert_eq!(phase, BattlePhase::Victory);
        assert_eq!(summary.unwrap().xp, 25);

        // Spoils landed on the persistent record.
        let party = runtime.party();
        {
            let member = party.lock().unwrap();
            assert_eq!(member.progression.xp, 25);
            assert_eq!(member.progression.gold, 10);
            assert_eq!(member.progression.level, 1);
            assert_eq!(member.progression.hp, 20);
        }

        // The bestiary learned the goblin's armor class and its drop.
        let notes = bestiary.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].species, "goblin");
        assert!(notes[0].ac_discovered);
        assert_eq!(notes[0].drops, vec!["small_fang".to_string()]);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_actions_leave_the_battle_untouched() {
        init_tracing();
        let rng = SequenceRng::from_faces([10, 5]);
        let runtime = BattleRuntime::builder()
            .config(fast_config())
            .party(hero())
            .encounter(EncounterSpec::new("cave", vec!["goblin".into()]))
            .rng(rng)
            .seed(7)
            .build()
            .await
            .unwrap();

        let handle = runtime.handle();
        let before = handle.view().await.unwrap();

        // The goblin cannot be commanded by the client.
        let bogus = Action::Attack(AttackAction::new(CombatantId(1), CombatantId::PLAYER));
        let err = handle.execute_action(bogus).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Execute(_)));

        let after = handle.view().await.unwrap();
        assert_eq!(before, after);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_species_fails_the_build() {
        init_tracing();
        let err = BattleRuntime::builder()
            .party(hero())
            .encounter(EncounterSpec::new("cave", vec!["dragon".into()]))
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownSpecies { .. }));

        let err = BattleRuntime::builder()
            .party(hero())
            .encounter(EncounterSpec::new("cave", Vec::new()))
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyEncounter));
    }
}

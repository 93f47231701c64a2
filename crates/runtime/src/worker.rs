//! Battle worker that owns the authoritative [`BattleSession`].
//!
//! Receives commands from [`crate::BattleHandle`], executes player actions
//! through [`combat_core::BattleEngine`], and publishes [`BattleEvent`]s.
//! Enemy turns are driven by a pacing timer inside the select loop: when the
//! machine enters `AwaitingEnemyAction` the worker arms a deadline, and the
//! deadline is dropped whenever the phase moves on or the handle closes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use combat_core::{
    Action, ActionReport, BattleEngine, BattlePhase, BattleSession, CombatEnv, CombatantId,
    LevelTableOracle, PartyMember, RngOracle, apply_rewards,
};
use combat_content::{ItemCatalog, MonsterCatalog, RuleTables, Spellbook};

use crate::collaborators::{BestiaryNote, BestiarySink};
use crate::error::{Result, RuntimeError};
use crate::event::BattleEvent;
use crate::view::BattleView;

/// Commands that can be sent to the battle worker.
pub enum Command {
    /// Execute a player action.
    ExecuteAction {
        action: Action,
        reply: oneshot::Sender<Result<ActionReport>>,
    },
    /// Snapshot the battle for display (read-only).
    QueryView { reply: oneshot::Sender<BattleView> },
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    session: BattleSession,
    rng: Box<dyn RngOracle>,
    monsters: MonsterCatalog,
    spellbook: Spellbook,
    items: ItemCatalog,
    tables: RuleTables,
    party: Arc<Mutex<PartyMember>>,
    bestiary: Option<Arc<dyn BestiarySink>>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<BattleEvent>,
    enemy_delay: Duration,
    enemy_deadline: Option<Instant>,
    finalized: bool,
}

impl BattleWorker {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        session: BattleSession,
        rng: Box<dyn RngOracle>,
        monsters: MonsterCatalog,
        spellbook: Spellbook,
        items: ItemCatalog,
        tables: RuleTables,
        party: Arc<Mutex<PartyMember>>,
        bestiary: Option<Arc<dyn BestiarySink>>,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<BattleEvent>,
        enemy_delay: Duration,
    ) -> Self {
        Self {
            session,
            rng,
            monsters,
            spellbook,
            items,
            tables,
            party,
            bestiary,
            command_rx,
            event_tx,
            enemy_delay,
            enemy_deadline: None,
            finalized: false,
        }
    }

    /// Roll initiative and open the battle. Called once before [`run`].
    ///
    /// Returns the opening narration lines.
    ///
    /// [`run`]: BattleWorker::run
    pub(crate) async fn open(&mut self) -> Result<Vec<String>> {
        let env = CombatEnv::with_all(
            self.rng.as_ref(),
            &self.monsters,
            &self.spellbook,
            &self.tables,
        );
        let report = BattleEngine::new(&mut self.session).start(&env)?;
        info!(
            seed = self.session.seed,
            phase = %self.session.phase,
            combatants = self.session.combatants().len(),
            "battle opened"
        );
        self.after_action(BattlePhase::Initializing).await;
        Ok(report.lines)
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        // Handle dropped: any pending enemy deadline dies
                        // with the loop.
                        None => break,
                    }
                }
                _ = tokio::time::sleep_until(
                    self.enemy_deadline.unwrap_or_else(Instant::now)
                ), if self.enemy_deadline.is_some() => {
                    self.enemy_deadline = None;
                    self.run_enemy_turn().await;
                }
            }
        }
        debug!("battle worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ExecuteAction { action, reply } => {
                let result = self.execute_action(action).await;
                if reply.send(result).is_err() {
                    debug!("ExecuteAction reply channel closed (caller dropped)");
                }
            }
            Command::QueryView { reply } => {
                if reply.send(BattleView::of(&self.session)).is_err() {
                    debug!("QueryView reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn execute_action(&mut self, action: Action) -> Result<ActionReport> {
        let before = self.session.phase;
        let env = CombatEnv::with_all(
            self.rng.as_ref(),
            &self.monsters,
            &self.spellbook,
            &self.tables,
        );
        let report = match BattleEngine::new(&mut self.session).execute(&env, &action) {
            Ok(report) => report,
            Err(e) => {
                debug!(actor = %action.actor(), kind = %action.kind(), error = %e, "action rejected");
                return Err(e.into());
            }
        };

        let _ = self.event_tx.send(BattleEvent::PlayerActed {
            actor: action.actor(),
            kind: action.kind(),
            lines: report.lines.clone(),
        });
        self.after_action(before).await;
        Ok(report)
    }

    async fn run_enemy_turn(&mut self) {
        // The deadline may have been armed before a terminal transition.
        if self.session.phase != BattlePhase::AwaitingEnemyAction {
            return;
        }
        let before = self.session.phase;
        let actor = self.session.turn.current().unwrap_or(CombatantId::PLAYER);
        let env = CombatEnv::with_all(
            self.rng.as_ref(),
            &self.monsters,
            &self.spellbook,
            &self.tables,
        );
        match BattleEngine::new(&mut self.session).run_enemy_turn(&env) {
            Ok(report) => {
                let _ = self.event_tx.send(BattleEvent::EnemyActed {
                    actor,
                    lines: report.lines,
                });
            }
            Err(e) => {
                warn!(actor = %actor, error = %e, "enemy turn failed");
            }
        }
        self.after_action(before).await;
    }

    /// Phase bookkeeping after any executed action: arm or disarm the enemy
    /// pacing timer and finalize terminal battles.
    async fn after_action(&mut self, before: BattlePhase) {
        let phase = self.session.phase;
        if phase != before {
            let _ = self.event_tx.send(BattleEvent::PhaseChanged { phase });
        }
        match phase {
            BattlePhase::AwaitingEnemyAction => {
                self.enemy_deadline = Some(Instant::now() + self.enemy_delay);
            }
            BattlePhase::AwaitingPlayerAction => {
                self.enemy_deadline = None;
            }
            _ => {
                self.enemy_deadline = None;
                self.finalize().await;
            }
        }
    }

    /// Close out a terminal battle: apply rewards and drops, write HP and
    /// inventory back to the persistent record, and notify the bestiary.
    async fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        let phase = self.session.phase;
        let summary =
            (phase == BattlePhase::Victory).then(|| self.session.victory_summary());

        {
            // A poisoned lock must not cost the player their spoils; the
            // record is only ever mutated here, so the data is still sound.
            let mut member = self
                .party
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(snapshot) = self.session.combatant(CombatantId::PLAYER) {
                member.write_back(snapshot);
            }
            if let Some(summary) = &summary {
                let report = apply_rewards(
                    &mut member.progression,
                    summary.xp,
                    summary.gold,
                    self.tables.level_table(),
                    &self.spellbook,
                );
                for defeated in &summary.defeated {
                    for drop_id in &defeated.drops {
                        // Drops without a catalog entry are trophies the
                        // inventory cannot hold.
                        if let Some(stack) = self.items.stack(drop_id, 1) {
                            member.inventory.add(stack);
                        }
                    }
                }
                info!(
                    xp = summary.xp,
                    gold = summary.gold,
                    levels = report.levels_gained.len(),
                    "rewards applied"
                );
                let _ = self
                    .event_tx
                    .send(BattleEvent::RewardsApplied { report });
            }
        }

        if let (Some(sink), Some(summary)) = (&self.bestiary, &summary) {
            for defeated in &summary.defeated {
                sink.record(BestiaryNote::from(defeated)).await;
            }
        }

        info!(phase = %phase, "battle ended");
        let _ = self
            .event_tx
            .send(BattleEvent::BattleEnded { phase, summary });
    }
}

impl std::fmt::Debug for BattleWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleWorker")
            .field("phase", &self.session.phase)
            .field("enemy_delay", &self.enemy_delay)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        Action, AttackAction, Inventory, MonsterOracle, Progression, SequenceRng, StatModifiers,
    };
    use combat_content::builtin_content;

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

    /// A worker facing one builtin goblin, enemy delay long enough that the
    /// pacing timer never fires on its own.
    fn goblin_fight(rng: SequenceRng) -> (BattleWorker, Arc<Mutex<PartyMember>>) {
        let content = builtin_content();
        let member = hero();
        let player = member.to_combatant(&content.spellbook);
        let goblin = content
            .monsters
            .template("goblin", "cave")
            .expect("builtin goblin")
            .spawn(CombatantId(1));
        let session = BattleSession::new(7, content.tables.config.clone(), vec![player, goblin]);
        let party = Arc::new(Mutex::new(member));

        let (_command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, _event_rx) = broadcast::channel(32);
        let worker = BattleWorker::new(
            session,
            Box::new(rng),
            content.monsters,
            content.spellbook,
            content.items,
            content.tables,
            Arc::clone(&party),
            None,
            command_rx,
            event_tx,
            Duration::from_secs(60),
        );
        (worker, party)
    }

    #[tokio::test]
    async fn stale_deadline_never_resolves_an_enemy_turn() {
        // Initiative faces: player 10+1 over goblin.
        let (mut worker, _party) = goblin_fight(SequenceRng::from_faces([10, 5]));
        worker.open().await.unwrap();
        assert_eq!(worker.session.phase, BattlePhase::AwaitingPlayerAction);

        // A deadline armed for the enemy can fire after the phase has already
        // moved on; the turn must not resolve.
        worker.enemy_deadline = Some(Instant::now());
        let mut events = worker.event_tx.subscribe();
        let hp_before = worker
            .session
            .combatant(CombatantId::PLAYER)
            .unwrap()
            .hp
            .current();

        worker.run_enemy_turn().await;

        assert_eq!(worker.session.phase, BattlePhase::AwaitingPlayerAction);
        let hero = worker.session.combatant(CombatantId::PLAYER).unwrap();
        assert_eq!(hero.hp.current(), hp_before);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn rewards_survive_a_poisoned_party_lock() {
        // Initiative 10+1 over 5, then a natural 20 doubles (6+2) for 16
        // damage, enough to down the 12 HP goblin outright.
        let (mut worker, party) = goblin_fight(SequenceRng::from_faces([10, 5, 20, 6]));
        worker.open().await.unwrap();

        let poisoner = Arc::clone(&party);
        std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the record");
        })
        .join()
        .unwrap_err();

        let attack = Action::Attack(AttackAction::new(CombatantId::PLAYER, CombatantId(1)));
        let report = worker.execute_action(attack).await.unwrap();
        assert!(report.lines.iter().any(|l| l == "Victory!"));
        assert_eq!(worker.session.phase, BattlePhase::Victory);

        let member = party.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        assert_eq!(member.progression.xp, 25);
        assert_eq!(member.progression.gold, 10);
    }
}

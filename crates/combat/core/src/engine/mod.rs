//! Battle state machine and action execution pipeline.
//!
//! The [`BattleEngine`] is the authoritative reducer for a
//! [`BattleSession`]. It validates phase and actor before every action,
//! routes the action through its transition, and checks terminal conditions
//! after every resolution, so no caller can double-resolve a turn or act in
//! a finished battle.

mod errors;
mod transition;
mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionReport, AttackAction};
use crate::env::CombatEnv;
use crate::state::{BattlePhase, BattleSession, Side};

/// Battle engine that manages action execution, turn sequencing, and the
/// battle phase machine.
pub struct BattleEngine<'a> {
    session: &'a mut BattleSession,
}

impl<'a> BattleEngine<'a> {
    pub fn new(session: &'a mut BattleSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &BattleSession {
        self.session
    }

    pub(super) fn session_ref(&self) -> &BattleSession {
        self.session
    }

    pub(super) fn session_mut(&mut self) -> &mut BattleSession {
        self.session
    }

    /// Leave `Initializing`: validate the roster, roll the opening turn
    /// order, and hand the first turn to whichever side won initiative.
    pub fn start(&mut self, env: &CombatEnv<'_>) -> Result<ActionReport, ExecuteError> {
        if self.session.phase != BattlePhase::Initializing {
            return Err(ExecuteError::WrongPhase {
                phase: self.session.phase,
            });
        }
        for side in [Side::Party, Side::Enemy] {
            if self.session.alive(side).next().is_none() {
                return Err(ExecuteError::EmptySide { side });
            }
        }
        for (i, combatant) in self.session.combatants().iter().enumerate() {
            if self.session.combatants()[..i]
                .iter()
                .any(|other| other.id == combatant.id)
            {
                return Err(ExecuteError::DuplicateCombatant(combatant.id));
            }
        }

        self.compute_opening_order(env)?;

        let mut report = ActionReport::default();
        let enemy_names: Vec<String> = self
            .session
            .side(Side::Enemy)
            .map(|c| c.name.clone())
            .collect();
        for name in enemy_names {
            report.log(self.session, format!("A {name} draws near!"));
        }

        self.session.phase = match self.current_side() {
            Some(Side::Party) => BattlePhase::AwaitingPlayerAction,
            _ => BattlePhase::AwaitingEnemyAction,
        };
        Ok(report)
    }

    /// Execute one player action.
    ///
    /// A request arriving while the machine is not in
    /// `AwaitingPlayerAction`, or naming the wrong actor, is rejected as a
    /// no-op: nothing is queued, nothing mutates.
    pub fn execute(
        &mut self,
        env: &CombatEnv<'_>,
        action: &Action,
    ) -> Result<ActionReport, ExecuteError> {
        if self.session.phase.is_terminal() {
            return Err(ExecuteError::BattleOver {
                phase: self.session.phase,
            });
        }
        if self.session.phase != BattlePhase::AwaitingPlayerAction {
            return Err(ExecuteError::WrongPhase {
                phase: self.session.phase,
            });
        }
        let current = self
            .session
            .turn
            .current()
            .ok_or(ExecuteError::EmptySide { side: Side::Party })?;
        if action.actor() != current {
            return Err(ExecuteError::ActorNotCurrent {
                actor: action.actor(),
                current,
            });
        }

        let mut report = transition::execute_transition(action, self.session, env)?;
        self.session.turn.nonce += 1;
        self.finish_turn(&mut report);
        Ok(report)
    }

    /// Resolve one automatic enemy action: the current enemy attacks the
    /// first living party combatant.
    pub fn run_enemy_turn(&mut self, env: &CombatEnv<'_>) -> Result<ActionReport, ExecuteError> {
        if self.session.phase.is_terminal() {
            return Err(ExecuteError::BattleOver {
                phase: self.session.phase,
            });
        }
        if self.session.phase != BattlePhase::AwaitingEnemyAction {
            return Err(ExecuteError::WrongPhase {
                phase: self.session.phase,
            });
        }
        let actor = self
            .session
            .turn
            .current()
            .ok_or(ExecuteError::EmptySide { side: Side::Enemy })?;
        let target = self
            .session
            .first_alive(Side::Party)
            .map(|c| c.id)
            .ok_or(ExecuteError::EmptySide { side: Side::Party })?;

        let action = Action::Attack(AttackAction::new(actor, target));
        let mut report = transition::execute_transition(&action, self.session, env)?;
        self.session.turn.nonce += 1;
        self.finish_turn(&mut report);
        Ok(report)
    }

    /// Post-action bookkeeping: terminal checks first, then turn handoff.
    fn finish_turn(&mut self, report: &mut ActionReport) {
        if self.session.phase.is_terminal() {
            // Escape resolved inside the action; nothing left to sequence.
            return;
        }
        if self.session.side_defeated(Side::Enemy) {
            self.session.phase = BattlePhase::Victory;
            report.log(self.session, "Victory!".to_string());
            return;
        }
        if self.session.side_defeated(Side::Party) {
            self.session.phase = BattlePhase::Defeat;
            report.log(self.session, "The party has fallen...".to_string());
            return;
        }

        self.drop_defeated_from_order();
        self.advance_turn();
        self.session.phase = match self.current_side() {
            Some(Side::Party) => BattlePhase::AwaitingPlayerAction,
            _ => BattlePhase::AwaitingEnemyAction,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{DefendAction, FleeAction, UseItemAction};
    use crate::config::BattleConfig;
    use crate::env::SequenceRng;
    use crate::state::test_support::{enemy, player};
    use crate::state::{CombatantId, ItemEffect, ItemStack};

    fn session() -> BattleSession {
        BattleSession::new(
            1,
            BattleConfig::default(),
            vec![player(), enemy(1, "Goblin")],
        )
    }

    fn started(faces: &[u32]) -> (BattleSession, SequenceRng) {
        let mut s = session();
        let rng = SequenceRng::from_faces(faces.iter().copied());
        {
            let env = CombatEnv::with_rng(&rng);
            BattleEngine::new(&mut s).start(&env).unwrap();
        }
        (s, rng)
    }

    #[test]
    fn start_computes_order_and_enters_awaiting_phase() {
        // player initiative 12+1, goblin 5: player first.
        let (s, _rng) = started(&[12, 5]);
        assert_eq!(s.phase, BattlePhase::AwaitingPlayerAction);
        assert_eq!(s.turn.current(), Some(CombatantId::PLAYER));
        assert_eq!(s.log.to_vec(), vec!["A Goblin draws near!"]);
    }

    #[test]
    fn enemy_can_win_initiative() {
        let (s, _rng) = started(&[2, 19]);
        assert_eq!(s.phase, BattlePhase::AwaitingEnemyAction);
        assert_eq!(s.turn.current(), Some(CombatantId(1)));
    }

    #[test]
    fn full_exchange_player_hits_then_enemy_acts() {
        // init: player 12+1 vs goblin 5; attack d20=15 hit, 1d8=5.
        let (mut s, rng) = started(&[12, 5, 15, 5]);
        let env = CombatEnv::with_rng(&rng);
        let mut engine = BattleEngine::new(&mut s);

        let action = Action::Attack(AttackAction::new(CombatantId::PLAYER, CombatantId(1)));
        let report = engine.execute(&env, &action).unwrap();
        assert_eq!(report.lines, vec!["Hero hits Goblin for 7 damage."]);
        assert_eq!(s.phase, BattlePhase::AwaitingEnemyAction);
        assert_eq!(s.combatant(CombatantId(1)).unwrap().hp.current(), 5);
    }

    #[test]
    fn killing_the_last_enemy_is_victory() {
        let (mut s, rng) = started(&[12, 5, 15, 5]);
        s.combatant_mut(CombatantId(1)).unwrap().hp.damage(11); // 1 HP left
        let env = CombatEnv::with_rng(&rng);
        let mut engine = BattleEngine::new(&mut s);

        let action = Action::Attack(AttackAction::new(CombatantId::PLAYER, CombatantId(1)));
        let report = engine.execute(&env, &action).unwrap();

        assert_eq!(s.phase, BattlePhase::Victory);
        assert_eq!(
            report.lines,
            vec![
                "Hero hits Goblin for 7 damage.",
                "Goblin is defeated!",
                "Victory!"
            ]
        );
        let summary = s.victory_summary();
        assert_eq!(summary.xp, 25);
        assert_eq!(summary.gold, 10);
    }

    #[test]
    fn enemy_turn_can_defeat_the_party() {
        let (mut s, _) = started(&[2, 19]); // goblin first
        s.combatant_mut(CombatantId::PLAYER).unwrap().hp.damage(19); // 1 HP left
        let rng = SequenceRng::from_faces([18, 4]); // hit for 1d6=4 +1
        let env = CombatEnv::with_rng(&rng);

        let report = BattleEngine::new(&mut s).run_enemy_turn(&env).unwrap();
        assert_eq!(s.phase, BattlePhase::Defeat);
        assert!(report.lines.iter().any(|l| l.contains("has fallen")));
    }

    #[test]
    fn wrong_phase_requests_are_rejected_without_mutation() {
        let (mut s, rng) = started(&[2, 19]); // enemy acts first
        let env = CombatEnv::with_rng(&rng);
        let mut engine = BattleEngine::new(&mut s);

        let action = Action::Defend(DefendAction::new(CombatantId::PLAYER));
        let err = engine.execute(&env, &action).unwrap_err();
        assert!(matches!(err, ExecuteError::WrongPhase { .. }));

        // And the enemy hook is rejected during the player's phase.
        let (mut s2, rng2) = started(&[12, 5]);
        let env2 = CombatEnv::with_rng(&rng2);
        let err2 = BattleEngine::new(&mut s2).run_enemy_turn(&env2).unwrap_err();
        assert!(matches!(err2, ExecuteError::WrongPhase { .. }));
        assert_eq!(s2.log.len(), 1); // only the opening line
    }

    #[test]
    fn terminal_battles_accept_no_actions() {
        let (mut s, rng) = started(&[12, 5]);
        s.phase = BattlePhase::Victory;
        let env = CombatEnv::with_rng(&rng);
        let action = Action::Defend(DefendAction::new(CombatantId::PLAYER));
        let err = BattleEngine::new(&mut s).execute(&env, &action).unwrap_err();
        assert!(matches!(err, ExecuteError::BattleOver { .. }));
    }

    #[test]
    fn failed_flee_passes_the_turn() {
        // init player first; flee d20=10 +dex 1 = 11 < 12.
        let (mut s, rng) = started(&[12, 5, 10]);
        let env = CombatEnv::with_rng(&rng);

        let action = Action::Flee(FleeAction::new(CombatantId::PLAYER));
        BattleEngine::new(&mut s).execute(&env, &action).unwrap();

        assert_eq!(s.phase, BattlePhase::AwaitingEnemyAction);
        let hero = s.combatant(CombatantId::PLAYER).unwrap();
        assert_eq!(hero.hp.current(), hero.hp.max());
    }

    #[test]
    fn escape_item_ends_battle_before_turn_handoff() {
        let mut s = session();
        s.combatant_mut(CombatantId::PLAYER)
            .unwrap()
            .inventory
            .add(ItemStack {
                id: "smoke".into(),
                name: "Smoke Ball".into(),
                effect: ItemEffect::Escape,
                dice: String::new(),
                quantity: 1,
            });
        let rng = SequenceRng::from_faces([12, 5]);
        {
            let env = CombatEnv::with_rng(&rng);
            BattleEngine::new(&mut s).start(&env).unwrap();

            let action = Action::UseItem(UseItemAction::new(CombatantId::PLAYER, "smoke"));
            BattleEngine::new(&mut s).execute(&env, &action).unwrap();
        }
        assert_eq!(s.phase, BattlePhase::Escaped);
    }

    #[test]
    fn awaiting_phases_always_have_both_sides_alive() {
        // Run a scripted battle to the end; after every accepted action, a
        // non-terminal phase implies both sides still have living members.
        let (mut s, _) = started(&[12, 5]);
        let script = [
            [15u32, 2u32], // player hits for 4
            [18, 3],       // goblin hits back
            [15, 3],       // player hits for 5
            [3, 0],        // goblin misses
            [15, 8],       // player fells it (12 damage total needed)
        ];
        for faces in script {
            let rng = SequenceRng::from_faces(faces.iter().copied().filter(|&f| f > 0));
            let env = CombatEnv::with_rng(&rng);
            let phase = s.phase;
            let mut engine = BattleEngine::new(&mut s);
            let result = match phase {
                BattlePhase::AwaitingPlayerAction => engine.execute(
                    &env,
                    &Action::Attack(AttackAction::new(CombatantId::PLAYER, CombatantId(1))),
                ),
                BattlePhase::AwaitingEnemyAction => engine.run_enemy_turn(&env),
                _ => break,
            };
            result.unwrap();
            if !s.phase.is_terminal() {
                assert!(s.alive(Side::Party).next().is_some());
                assert!(s.alive(Side::Enemy).next().is_some());
            }
        }
        assert_eq!(s.phase, BattlePhase::Victory);
    }
}

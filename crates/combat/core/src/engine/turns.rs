//! Turn order computation.
//!
//! Policy: one initiative roll per combatant at battle start (`1d20` plus the
//! combatant's initiative modifier), descending, with ties broken by original
//! insertion order (stable sort). The order is never re-rolled mid-battle;
//! defeats only filter the dead out, preserving the relative order of the
//! living.

use crate::env::{CombatEnv, OracleError, compute_seed};
use crate::state::Side;

use super::BattleEngine;

/// Seed context salt separating initiative rolls from action rolls.
const INITIATIVE_SALT: u32 = 0x7000_0000;

impl<'a> BattleEngine<'a> {
    /// Roll initiative for every living combatant and store the opening order.
    pub(super) fn compute_opening_order(
        &mut self,
        env: &CombatEnv<'_>,
    ) -> Result<(), OracleError> {
        let rng = env.rng()?;
        let session = self.session_mut();

        let mut scored: Vec<_> = session
            .combatants()
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| {
                let seed = compute_seed(session.seed, INITIATIVE_SALT | c.id.0);
                let score = rng.roll_die(seed, 20) as i32 + c.initiative_modifier;
                (c.id, score)
            })
            .collect();

        // Stable sort keeps insertion order on ties.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        session.turn.order = scored.into_iter().map(|(id, _)| id).collect();
        session.turn.cursor = 0;
        session.turn.round = 1;
        Ok(())
    }

    /// Drop defeated combatants from the order without disturbing the
    /// relative order of the rest. Keeps the cursor on the current actor.
    pub(super) fn drop_defeated_from_order(&mut self) {
        let session = self.session_mut();
        let current = session.turn.current();

        let alive: Vec<_> = session
            .turn
            .order
            .iter()
            .copied()
            .filter(|&id| session.combatant(id).is_some_and(|c| c.is_alive()))
            .collect();

        session.turn.cursor = current
            .and_then(|id| alive.iter().position(|&x| x == id))
            .unwrap_or(0);
        session.turn.order = alive;
    }

    /// Move the cursor to the next combatant, wrapping into a new round, and
    /// clear the new actor's defend stance (it lasted until this turn).
    pub(super) fn advance_turn(&mut self) {
        let session = self.session_mut();
        if session.turn.order.is_empty() {
            return;
        }
        session.turn.cursor += 1;
        if session.turn.cursor >= session.turn.order.len() {
            session.turn.cursor = 0;
            session.turn.round += 1;
        }
        if let Some(id) = session.turn.current() {
            if let Some(actor) = session.combatant_mut(id) {
                actor.defend_bonus = 0;
            }
        }
    }

    /// Phase implied by the side of the current actor.
    pub(super) fn current_side(&self) -> Option<Side> {
        let session = self.session_ref();
        session.current_actor().map(|c| c.side)
    }
}

//! Action transition dispatch.

use crate::action::{Action, ActionReport, ActionTransition};
use crate::env::CombatEnv;
use crate::state::BattleSession;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the two-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - check preconditions before any mutation
/// 2. `apply` - mutate the session and append log lines atomically
#[inline]
fn drive_transition<T>(
    transition: &T,
    session: &mut BattleSession,
    env: &CombatEnv<'_>,
) -> Result<ActionReport, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(session, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(session, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))
}

/// Routes an action to its transition. Used by `BattleEngine::execute` after
/// phase and actor validation.
pub(super) fn execute_transition(
    action: &Action,
    session: &mut BattleSession,
    env: &CombatEnv<'_>,
) -> Result<ActionReport, ExecuteError> {
    match action {
        Action::Attack(transition) => {
            drive_transition(transition, session, env).map_err(ExecuteError::Attack)
        }
        Action::CastSpell(transition) => {
            drive_transition(transition, session, env).map_err(ExecuteError::CastSpell)
        }
        Action::UseItem(transition) => {
            drive_transition(transition, session, env).map_err(ExecuteError::UseItem)
        }
        Action::Defend(transition) => {
            drive_transition(transition, session, env).map_err(|e| match e.error {})
        }
        Action::Flee(transition) => {
            drive_transition(transition, session, env).map_err(ExecuteError::Flee)
        }
    }
}

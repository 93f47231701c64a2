//! Error types for the battle execution pipeline.

use crate::action::{AttackError, FleeError, ItemError, SpellError};
use crate::env::OracleError;
use crate::state::{BattlePhase, CombatantId, Side};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an action through the battle engine.
///
/// Every variant is a local rejection: the session state is untouched and
/// the battle continues. There are no fatal errors inside the combat core.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("attack action failed: {0}")]
    Attack(TransitionPhaseError<AttackError>),

    #[error("cast spell action failed: {0}")]
    CastSpell(TransitionPhaseError<SpellError>),

    #[error("use item action failed: {0}")]
    UseItem(TransitionPhaseError<ItemError>),

    #[error("flee action failed: {0}")]
    Flee(TransitionPhaseError<FleeError>),

    #[error("battle is over ({phase})")]
    BattleOver { phase: BattlePhase },

    #[error("action not accepted in phase {phase}")]
    WrongPhase { phase: BattlePhase },

    #[error("actor {actor} is not the current turn actor {current}")]
    ActorNotCurrent {
        actor: CombatantId,
        current: CombatantId,
    },

    #[error("battle has no living {side:?} combatants")]
    EmptySide { side: Side },

    #[error("duplicate combatant id {0}")]
    DuplicateCombatant(CombatantId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ExecuteError {
    /// Whether this rejection was an illegal escape attempt (boss flee or
    /// boss escape item).
    pub fn is_illegal_escape(&self) -> bool {
        matches!(
            self,
            ExecuteError::Flee(TransitionPhaseError {
                error: FleeError::IllegalEscape,
                ..
            }) | ExecuteError::UseItem(TransitionPhaseError {
                error: ItemError::EscapeVersusBoss,
                ..
            })
        )
    }
}

//! Combat actions and the transition pipeline.
//!
//! Every way a combatant can spend a turn is an [`Action`] variant backed by
//! a transition type implementing [`ActionTransition`]. Transitions run in
//! two phases: `pre_validate` checks preconditions without touching state,
//! `apply` mutates the session and appends the matching log lines in the same
//! step, so a test can never observe a log entry without its state change or
//! vice versa.

mod attack;
mod defend;
mod flee;
mod item;
mod spell;

pub use attack::{AttackAction, AttackError};
pub use defend::DefendAction;
pub use flee::{FleeAction, FleeError};
pub use item::{ItemError, UseItemAction};
pub use spell::{CastSpellAction, SpellError};

use crate::env::CombatEnv;
use crate::state::{BattleSession, CombatantId};

/// One combat action request, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Attack(AttackAction),
    CastSpell(CastSpellAction),
    UseItem(UseItemAction),
    Defend(DefendAction),
    Flee(FleeAction),
}

impl Action {
    pub fn actor(&self) -> CombatantId {
        match self {
            Action::Attack(a) => a.actor,
            Action::CastSpell(a) => a.actor,
            Action::UseItem(a) => a.actor,
            Action::Defend(a) => a.actor,
            Action::Flee(a) => a.actor,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Attack(_) => ActionKind::Attack,
            Action::CastSpell(_) => ActionKind::CastSpell,
            Action::UseItem(_) => ActionKind::UseItem,
            Action::Defend(_) => ActionKind::Defend,
            Action::Flee(_) => ActionKind::Flee,
        }
    }
}

/// Action kind tag, used for UI affordances and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionKind {
    Attack,
    CastSpell,
    UseItem,
    Defend,
    Flee,
}

/// Log lines produced by one resolved action, in order.
///
/// The same lines are already appended to the session log; the report exists
/// so callers (runtime, UI) can surface just the new entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub lines: Vec<String>,
}

impl ActionReport {
    /// Append a line to both the session log and this report.
    pub(crate) fn log(&mut self, session: &mut BattleSession, line: String) {
        session.log.push(line.clone());
        self.lines.push(line);
    }
}

/// A state transition triggered by one combat action.
///
/// `pre_validate` must not mutate; a transition whose `pre_validate` fails is
/// a no-op rejection. `apply` performs every mutation (HP, inventory, phase)
/// atomically with the log entries it reports.
pub trait ActionTransition {
    type Error;

    fn pre_validate(
        &self,
        _session: &BattleSession,
        _env: &CombatEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<ActionReport, Self::Error>;
}

//! Flee action.

use crate::env::{CombatEnv, OracleError};
use crate::state::{BattlePhase, BattleSession, CombatantId, Side, StatKey};

use super::{ActionReport, ActionTransition};

/// Attempt to run from the battle: `1d20 + dexterity` against the escape
/// threshold. Failure consumes the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleeAction {
    pub actor: CombatantId,
}

impl FleeAction {
    pub fn new(actor: CombatantId) -> Self {
        Self { actor }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FleeError {
    #[error("cannot flee from a boss")]
    IllegalEscape,
    #[error("actor {0} is not in the battle")]
    UnknownActor(CombatantId),
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ActionTransition for FleeAction {
    type Error = FleeError;

    fn pre_validate(
        &self,
        session: &BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<(), Self::Error> {
        env.rng()?;
        session
            .combatant(self.actor)
            .ok_or(FleeError::UnknownActor(self.actor))?;
        if session.alive(Side::Enemy).any(|enemy| enemy.boss) {
            return Err(FleeError::IllegalEscape);
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<ActionReport, Self::Error> {
        self.pre_validate(session, env)?;
        let rng = env.rng()?;

        let (name, dexterity) = {
            let actor = session
                .combatant(self.actor)
                .ok_or(FleeError::UnknownActor(self.actor))?;
            (actor.name.clone(), actor.stats.get(StatKey::Dexterity))
        };

        let roll = rng.roll_die(session.roll_seed(0), 20) as i32 + dexterity;
        let mut report = ActionReport::default();
        if roll >= session.config.escape_threshold {
            session.phase = BattlePhase::Escaped;
            report.log(session, format!("{name} flees the battle!"));
        } else {
            report.log(session, format!("{name} tries to flee but can't get away!"));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use crate::env::SequenceRng;
    use crate::state::test_support::{enemy, player};

    fn session() -> BattleSession {
        let mut s = BattleSession::new(
            1,
            BattleConfig::default(),
            vec![player(), enemy(1, "Goblin")],
        );
        s.phase = BattlePhase::AwaitingPlayerAction;
        s.turn.order = vec![CombatantId::PLAYER, CombatantId(1)];
        s
    }

    #[test]
    fn failed_flee_consumes_turn_without_mutation() {
        let mut s = session();
        // d20=10, dexterity 1 -> 11 < threshold 12.
        let rng = SequenceRng::from_faces([10]);
        let env = CombatEnv::with_rng(&rng);

        let report = FleeAction::new(CombatantId::PLAYER)
            .apply(&mut s, &env)
            .unwrap();

        assert_eq!(s.phase, BattlePhase::AwaitingPlayerAction);
        let hero = s.combatant(CombatantId::PLAYER).unwrap();
        assert_eq!(hero.hp.current(), hero.hp.max());
        assert!(report.lines[0].contains("can't get away"));
    }

    #[test]
    fn successful_flee_escapes() {
        let mut s = session();
        // d20=11, dexterity 1 -> 12 meets the threshold.
        let rng = SequenceRng::from_faces([11]);
        let env = CombatEnv::with_rng(&rng);

        FleeAction::new(CombatantId::PLAYER)
            .apply(&mut s, &env)
            .unwrap();
        assert_eq!(s.phase, BattlePhase::Escaped);
    }

    #[test]
    fn boss_fight_rejects_flee_without_mutation() {
        let mut s = session();
        s.combatant_mut(CombatantId(1)).unwrap().boss = true;
        let rng = SequenceRng::from_faces([20]);
        let env = CombatEnv::with_rng(&rng);

        let err = FleeAction::new(CombatantId::PLAYER)
            .apply(&mut s, &env)
            .unwrap_err();
        assert_eq!(err, FleeError::IllegalEscape);
        assert_eq!(s.phase, BattlePhase::AwaitingPlayerAction);
        assert!(s.log.is_empty());
        // The d20 was never rolled.
        assert_eq!(rng.remaining(), 1);
    }
}

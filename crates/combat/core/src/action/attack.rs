//! Weapon attack action.

use crate::combat::{AttackOutcome, resolve_attack};
use crate::env::{CombatEnv, OracleError};
use crate::state::{BattleSession, CombatantId, Side};

use super::{ActionReport, ActionTransition};

/// Offensive weapon action against a target combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAction {
    pub actor: CombatantId,
    pub target: CombatantId,
}

impl AttackAction {
    pub fn new(actor: CombatantId, target: CombatantId) -> Self {
        Self { actor, target }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("target {0} is not a living opponent")]
    InvalidTarget(CombatantId),
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ActionTransition for AttackAction {
    type Error = AttackError;

    fn pre_validate(
        &self,
        session: &BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<(), Self::Error> {
        env.rng()?;
        let actor = session
            .combatant(self.actor)
            .ok_or(AttackError::InvalidTarget(self.actor))?;
        let target = session
            .combatant(self.target)
            .ok_or(AttackError::InvalidTarget(self.target))?;
        if !target.is_alive() || target.side == actor.side {
            return Err(AttackError::InvalidTarget(self.target));
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<ActionReport, Self::Error> {
        let rng = env.rng()?;
        let hit_seed = session.roll_seed(0);
        let damage_seed = session.roll_seed(1);

        let (result, actor_name, actor_side, target_name) = {
            let actor = session
                .combatant(self.actor)
                .ok_or(AttackError::InvalidTarget(self.actor))?;
            let target = session
                .combatant(self.target)
                .ok_or(AttackError::InvalidTarget(self.target))?;
            (
                resolve_attack(actor, target, &session.config, rng, hit_seed, damage_seed),
                actor.name.clone(),
                actor.side,
                target.name.clone(),
            )
        };

        let mut report = ActionReport::default();
        match result.outcome {
            AttackOutcome::CriticalMiss => {
                report.log(session, format!("{actor_name} fumbles the attack!"));
            }
            AttackOutcome::Miss => {
                report.log(
                    session,
                    format!("{actor_name} attacks {target_name} but misses."),
                );
            }
            AttackOutcome::Hit | AttackOutcome::Critical => {
                let damage = result.damage.unwrap_or(0);
                let downed = {
                    let target = session
                        .combatant_mut(self.target)
                        .ok_or(AttackError::InvalidTarget(self.target))?;
                    target.hp.damage(damage);
                    if actor_side == Side::Party {
                        // A landed hit empirically probes the armor class.
                        target.ac_discovered = true;
                    }
                    !target.is_alive()
                };

                if result.outcome == AttackOutcome::Critical {
                    report.log(
                        session,
                        format!(
                            "Critical hit! {actor_name} strikes {target_name} for {damage} damage!"
                        ),
                    );
                } else {
                    report.log(
                        session,
                        format!("{actor_name} hits {target_name} for {damage} damage."),
                    );
                }
                if downed {
                    report.log(session, format!("{target_name} is defeated!"));
                }
            }
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
        s.turn.order = vec![CombatantId::PLAYER, CombatantId(1)];
        s
    }

    #[test]
    fn hit_damages_and_marks_ac_discovered() {
        let mut s = session();
        let rng = SequenceRng::from_faces([15, 5]);
        let env = CombatEnv::with_rng(&rng);
        let action = AttackAction::new(CombatantId::PLAYER, CombatantId(1));

        action.pre_validate(&s, &env).unwrap();
        let report = action.apply(&mut s, &env).unwrap();

        let goblin = s.combatant(CombatantId(1)).unwrap();
        // 1d8=5 + damage modifier 2 = 7.
        assert_eq!(goblin.hp.current(), 5);
        assert!(goblin.ac_discovered);
        assert_eq!(report.lines, vec!["Hero hits Goblin for 7 damage."]);
        assert_eq!(s.log.to_vec(), report.lines);
    }

    #[test]
    fn miss_leaves_state_untouched() {
        let mut s = session();
        let rng = SequenceRng::from_faces([5]);
        let env = CombatEnv::with_rng(&rng);
        let report = AttackAction::new(CombatantId::PLAYER, CombatantId(1))
            .apply(&mut s, &env)
            .unwrap();

        let goblin = s.combatant(CombatantId(1)).unwrap();
        assert_eq!(goblin.hp.current(), goblin.hp.max());
        assert!(!goblin.ac_discovered);
        assert_eq!(report.lines.len(), 1);
        assert!(report.lines[0].contains("misses"));
    }

    #[test]
    fn kill_appends_defeat_line() {
        let mut s = session();
        s.combatant_mut(CombatantId(1)).unwrap().hp.damage(11); // 1 HP left
        let rng = SequenceRng::from_faces([15, 5]);
        let env = CombatEnv::with_rng(&rng);
        let report = AttackAction::new(CombatantId::PLAYER, CombatantId(1))
            .apply(&mut s, &env)
            .unwrap();

        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.lines[1], "Goblin is defeated!");
        assert!(!s.combatant(CombatantId(1)).unwrap().is_alive());
    }

    #[test]
    fn rejects_dead_or_friendly_targets() {
        let mut s = session();
        s.combatant_mut(CombatantId(1)).unwrap().hp.damage(999);
        let rng = SequenceRng::from_faces([15]);
        let env = CombatEnv::with_rng(&rng);

        let dead = AttackAction::new(CombatantId::PLAYER, CombatantId(1));
        assert!(matches!(
            dead.pre_validate(&s, &env),
            Err(AttackError::InvalidTarget(_))
        ));

        let own = AttackAction::new(CombatantId::PLAYER, CombatantId::PLAYER);
        assert!(matches!(
            own.pre_validate(&s, &env),
            Err(AttackError::InvalidTarget(_))
        ));
    }

    #[test]
    fn enemy_hits_do_not_probe_party_ac() {
        let mut s = session();
        s.turn.cursor = 1; // goblin acting
        let rng = SequenceRng::from_faces([18, 4]);
        let env = CombatEnv::with_rng(&rng);
        AttackAction::new(CombatantId(1), CombatantId::PLAYER)
            .apply(&mut s, &env)
            .unwrap();

        let hero = s.combatant(CombatantId::PLAYER).unwrap();
        assert!(hero.hp.current() < hero.hp.max());
        assert!(!hero.ac_discovered);
    }
}

//! Spell casting action.

use crate::combat::{damage_amount, heal_amount};
use crate::dice::roll_notation;
use crate::env::{CombatEnv, OracleError};
use crate::state::{BattleSession, CombatantId, Side, Spell, SpellEffect};

use super::{ActionReport, ActionTransition};

/// Cast a known spell. `target` defaults to the first living opponent for
/// damage spells and to the caster for heals.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastSpellAction {
    pub actor: CombatantId,
    pub spell_id: String,
    pub target: Option<CombatantId>,
}

impl CastSpellAction {
    pub fn new(actor: CombatantId, spell_id: impl Into<String>) -> Self {
        Self {
            actor,
            spell_id: spell_id.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    /// Resolve the spell and the effective target without mutating.
    fn resolve(
        &self,
        session: &BattleSession,
    ) -> Result<(Spell, CombatantId), SpellError> {
        let actor = session
            .combatant(self.actor)
            .ok_or_else(|| SpellError::UnknownSpell(self.spell_id.clone()))?;
        let spell = actor
            .spell(&self.spell_id)
            .ok_or_else(|| SpellError::UnknownSpell(self.spell_id.clone()))?
            .clone();
        if actor.level < spell.min_level {
            return Err(SpellError::LevelTooLow {
                required: spell.min_level,
                level: actor.level,
            });
        }

        let target_id = match spell.effect {
            SpellEffect::Damage => {
                let opposing = match actor.side {
                    Side::Party => Side::Enemy,
                    Side::Enemy => Side::Party,
                };
                let id = self
                    .target
                    .or_else(|| session.first_alive(opposing).map(|c| c.id))
                    .ok_or(SpellError::NoTarget)?;
                let target = session.combatant(id).ok_or(SpellError::InvalidTarget(id))?;
                if !target.is_alive() || target.side == actor.side {
                    return Err(SpellError::InvalidTarget(id));
                }
                id
            }
            SpellEffect::Heal => {
                let id = self.target.unwrap_or(self.actor);
                let target = session.combatant(id).ok_or(SpellError::InvalidTarget(id))?;
                // Healing never targets the enemy side.
                if !target.is_alive() || target.side != actor.side {
                    return Err(SpellError::InvalidTarget(id));
                }
                id
            }
        };

        Ok((spell, target_id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpellError {
    #[error("spell '{0}' is not known to the caster")]
    UnknownSpell(String),
    #[error("spell requires level {required}, caster is level {level}")]
    LevelTooLow { required: u32, level: u32 },
    #[error("no valid target for the spell")]
    NoTarget,
    #[error("target {0} is not valid for the spell")]
    InvalidTarget(CombatantId),
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ActionTransition for CastSpellAction {
    type Error = SpellError;

    fn pre_validate(
        &self,
        session: &BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<(), Self::Error> {
        env.rng()?;
        self.resolve(session).map(|_| ())
    }

    fn apply(
        &self,
        session: &mut BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<ActionReport, Self::Error> {
        let rng = env.rng()?;
        let (spell, target_id) = self.resolve(session)?;

        let (actor_name, stat_bonus) = {
            let actor = session
                .combatant(self.actor)
                .ok_or_else(|| SpellError::UnknownSpell(self.spell_id.clone()))?;
            let bonus = spell.modifier.map(|key| actor.stats.get(key)).unwrap_or(0);
            (actor.name.clone(), bonus)
        };

        // Context 1 keeps spell dice independent of any to-hit context.
        let roll = roll_notation(&spell.dice, rng, session.roll_seed(1)) + stat_bonus;

        let mut report = ActionReport::default();
        match spell.effect {
            SpellEffect::Damage => {
                let amount = damage_amount(roll);
                let (target_name, downed) = {
                    let target = session
                        .combatant_mut(target_id)
                        .ok_or(SpellError::InvalidTarget(target_id))?;
                    target.hp.damage(amount);
                    (target.name.clone(), !target.is_alive())
                };
                report.log(
                    session,
                    format!(
                        "{actor_name} casts {} at {target_name} for {amount} damage!",
                        spell.name
                    ),
                );
                if downed {
                    report.log(session, format!("{target_name} is defeated!"));
                }
            }
            SpellEffect::Heal => {
                let amount = heal_amount(roll, 0);
                let (target_name, healed) = {
                    let target = session
                        .combatant_mut(target_id)
                        .ok_or(SpellError::InvalidTarget(target_id))?;
                    (target.name.clone(), target.hp.heal(amount))
                };
                if target_id == self.actor {
                    report.log(
                        session,
                        format!("{actor_name} casts {}, restoring {healed} HP.", spell.name),
                    );
                } else {
                    report.log(
                        session,
                        format!(
                            "{actor_name} casts {} on {target_name}, restoring {healed} HP.",
                            spell.name
                        ),
                    );
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

    fn spark() -> Spell {
        Spell {
            id: "spark".into(),
            name: "Spark".into(),
            effect: SpellEffect::Damage,
            dice: "2d4".into(),
            modifier: Some(crate::state::StatKey::Intelligence),
            min_level: 1,
        }
    }

    fn mend() -> Spell {
        Spell {
            id: "mend".into(),
            name: "Mend".into(),
            effect: SpellEffect::Heal,
            dice: "1d8".into(),
            modifier: Some(crate::state::StatKey::Wisdom),
            min_level: 2,
        }
    }

    fn session() -> BattleSession {
        let mut hero = player();
        hero.spells.push(spark());
        hero.spells.push(mend());
        let mut s = BattleSession::new(
            1,
            BattleConfig::default(),
            vec![hero, enemy(1, "Goblin")],
        );
        s.turn.order = vec![CombatantId::PLAYER, CombatantId(1)];
        s
    }

    #[test]
    fn damage_spell_bypasses_to_hit() {
        let mut s = session();
        // 2d4 forced to 3+2 = 5, intelligence modifier 1 -> 6 damage.
        let rng = SequenceRng::from_faces([3, 2]);
        let env = CombatEnv::with_rng(&rng);
        let action = CastSpellAction::new(CombatantId::PLAYER, "spark");

        action.pre_validate(&s, &env).unwrap();
        let report = action.apply(&mut s, &env).unwrap();

        assert_eq!(s.combatant(CombatantId(1)).unwrap().hp.current(), 6);
        assert_eq!(report.lines, vec!["Hero casts Spark at Goblin for 6 damage!"]);
    }

    #[test]
    fn heal_spell_clamps_to_max_and_targets_self() {
        let mut s = session();
        s.combatant_mut(CombatantId::PLAYER).unwrap().hp.damage(3);
        s.combatant_mut(CombatantId::PLAYER).unwrap().level = 2;
        let rng = SequenceRng::from_faces([8]);
        let env = CombatEnv::with_rng(&rng);

        let report = CastSpellAction::new(CombatantId::PLAYER, "mend")
            .apply(&mut s, &env)
            .unwrap();

        let hero = s.combatant(CombatantId::PLAYER).unwrap();
        assert_eq!(hero.hp.current(), hero.hp.max());
        assert_eq!(report.lines, vec!["Hero casts Mend, restoring 3 HP."]);
        // The enemy was never touched.
        let goblin = s.combatant(CombatantId(1)).unwrap();
        assert_eq!(goblin.hp.current(), goblin.hp.max());
    }

    #[test]
    fn unknown_spell_is_rejected() {
        let s = session();
        let rng = SequenceRng::from_faces([]);
        let env = CombatEnv::with_rng(&rng);
        let err = CastSpellAction::new(CombatantId::PLAYER, "meteor")
            .pre_validate(&s, &env)
            .unwrap_err();
        assert!(matches!(err, SpellError::UnknownSpell(_)));
    }

    #[test]
    fn level_requirement_is_enforced() {
        let s = session(); // hero is level 1, mend needs 2
        let rng = SequenceRng::from_faces([]);
        let env = CombatEnv::with_rng(&rng);
        let err = CastSpellAction::new(CombatantId::PLAYER, "mend")
            .pre_validate(&s, &env)
            .unwrap_err();
        assert_eq!(
            err,
            SpellError::LevelTooLow {
                required: 2,
                level: 1
            }
        );
    }
}

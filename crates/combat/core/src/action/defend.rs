//! Defend stance action.

use core::convert::Infallible;

use crate::env::CombatEnv;
use crate::state::{BattleSession, CombatantId};

use super::{ActionReport, ActionTransition};

/// Take a defensive stance: grants the configured AC bonus until the start
/// of the actor's next turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefendAction {
    pub actor: CombatantId,
}

impl DefendAction {
    pub fn new(actor: CombatantId) -> Self {
        Self { actor }
    }
}

impl ActionTransition for DefendAction {
    type Error = Infallible;

    fn apply(
        &self,
        session: &mut BattleSession,
        _env: &CombatEnv<'_>,
    ) -> Result<ActionReport, Self::Error> {
        let bonus = session.config.defend_bonus;
        let name = match session.combatant_mut(self.actor) {
            Some(actor) => {
                actor.defend_bonus = bonus;
                actor.name.clone()
            }
            None => return Ok(ActionReport::default()),
        };

        let mut report = ActionReport::default();
        report.log(session, format!("{name} takes a defensive stance."));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use crate::state::test_support::{enemy, player};

    #[test]
    fn defend_raises_effective_ac_and_logs() {
        let mut s = BattleSession::new(
            1,
            BattleConfig::default(),
            vec![player(), enemy(1, "Goblin")],
        );
        let env = CombatEnv::empty();

        let report = DefendAction::new(CombatantId::PLAYER)
            .apply(&mut s, &env)
            .unwrap();

        let hero = s.combatant(CombatantId::PLAYER).unwrap();
        assert_eq!(hero.effective_ac(), hero.armor_class + 2);
        assert_eq!(report.lines, vec!["Hero takes a defensive stance."]);
    }
}

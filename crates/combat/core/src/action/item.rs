//! Consumable item action.

use crate::combat::{damage_amount, heal_amount};
use crate::dice::roll_notation;
use crate::env::{CombatEnv, OracleError};
use crate::state::{BattlePhase, BattleSession, CombatantId, ItemEffect, Side};

use super::{ActionReport, ActionTransition};

/// Use one item from the actor's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemAction {
    pub actor: CombatantId,
    pub item_id: String,
}

impl UseItemAction {
    pub fn new(actor: CombatantId, item_id: impl Into<String>) -> Self {
        Self {
            actor,
            item_id: item_id.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    /// Missing stack and empty stack are the same condition: empty stacks
    /// are filtered from the inventory.
    #[error("item '{0}' is not in the inventory")]
    UnknownItem(String),
    #[error("escape items do not work against a boss")]
    EscapeVersusBoss,
    #[error("no valid target for the item")]
    NoTarget,
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ActionTransition for UseItemAction {
    type Error = ItemError;

    fn pre_validate(
        &self,
        session: &BattleSession,
        env: &CombatEnv<'_>,
    ) -> Result<(), Self::Error> {
        env.rng()?;
        let actor = session
            .combatant(self.actor)
            .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?;
        let stack = actor
            .inventory
            .get(&self.item_id)
            .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?;
        if stack.effect == ItemEffect::Escape
            && session.alive(Side::Enemy).any(|enemy| enemy.boss)
        {
            return Err(ItemError::EscapeVersusBoss);
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
        let roll_seed = session.roll_seed(1);

        let (actor_name, actor_side, item_name, effect, dice) = {
            let actor = session
                .combatant(self.actor)
                .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?;
            let stack = actor
                .inventory
                .get(&self.item_id)
                .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?;
            (
                actor.name.clone(),
                actor.side,
                stack.name.clone(),
                stack.effect,
                stack.dice.clone(),
            )
        };

        let mut report = ActionReport::default();
        match effect {
            ItemEffect::Heal => {
                let amount = heal_amount(roll_notation(&dice, rng, roll_seed), 1);
                let healed = {
                    let actor = session
                        .combatant_mut(self.actor)
                        .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?;
                    let healed = actor.hp.heal(amount);
                    actor.inventory.remove(&self.item_id, 1);
                    healed
                };
                report.log(
                    session,
                    format!("{actor_name} uses a {item_name}, restoring {healed} HP."),
                );
            }
            ItemEffect::Damage => {
                let opposing = match actor_side {
                    Side::Party => Side::Enemy,
                    Side::Enemy => Side::Party,
                };
                let target_id = session
                    .first_alive(opposing)
                    .map(|c| c.id)
                    .ok_or(ItemError::NoTarget)?;
                let amount = damage_amount(roll_notation(&dice, rng, roll_seed));

                session
                    .combatant_mut(self.actor)
                    .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?
                    .inventory
                    .remove(&self.item_id, 1);

                let (target_name, downed) = {
                    let target = session
                        .combatant_mut(target_id)
                        .ok_or(ItemError::NoTarget)?;
                    target.hp.damage(amount);
                    (target.name.clone(), !target.is_alive())
                };
                report.log(
                    session,
                    format!("{actor_name} hurls a {item_name} at {target_name} for {amount} damage!"),
                );
                if downed {
                    report.log(session, format!("{target_name} is defeated!"));
                }
            }
            ItemEffect::Escape => {
                session
                    .combatant_mut(self.actor)
                    .ok_or_else(|| ItemError::UnknownItem(self.item_id.clone()))?
                    .inventory
                    .remove(&self.item_id, 1);
                session.phase = BattlePhase::Escaped;
                report.log(
                    session,
                    format!("{actor_name} uses a {item_name}. The party escapes!"),
                );
            }
        }

        Ok(report)
    }
}

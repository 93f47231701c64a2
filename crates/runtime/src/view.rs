//! Read-only battle snapshots for clients.
//!
//! A [`BattleView`] is built inside the worker from the authoritative
//! session, so clients never observe a half-applied action. Enemy armor
//! class is hidden until a party attack has landed on that enemy.

use combat_core::{
    ActionKind, BattlePhase, BattleSession, Combatant, CombatantId, Side,
};

/// One combatant as a client may see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatantView {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub boss: bool,
    pub hp_current: u32,
    pub hp_max: u32,
    /// Hidden (`None`) for enemies until a party attack has hit them.
    pub armor_class: Option<i32>,
    pub alive: bool,
}

impl CombatantView {
    fn of(combatant: &Combatant) -> Self {
        let armor_class = match combatant.side {
            Side::Party => Some(combatant.armor_class),
            Side::Enemy if combatant.ac_discovered => Some(combatant.armor_class),
            Side::Enemy => None,
        };
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
            side: combatant.side,
            boss: combatant.boss,
            hp_current: combatant.hp.current(),
            hp_max: combatant.hp.max(),
            armor_class,
            alive: combatant.is_alive(),
        }
    }
}

/// Consistent snapshot of one battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleView {
    pub phase: BattlePhase,
    pub round: u32,
    /// Whose turn it is, if the battle is live.
    pub current: Option<CombatantId>,
    pub combatants: Vec<CombatantView>,
    /// The visible tail of the battle log, oldest first.
    pub log: Vec<String>,
    /// Actions the player may submit right now. Empty unless the phase is
    /// `AwaitingPlayerAction` and it is the player's turn.
    pub available: Vec<ActionKind>,
}

impl BattleView {
    /// Snapshot the session.
    pub fn of(session: &BattleSession) -> Self {
        Self {
            phase: session.phase,
            round: session.turn.round,
            current: session.turn.current(),
            combatants: session.combatants().iter().map(CombatantView::of).collect(),
            log: session.log.to_vec(),
            available: available_actions(session),
        }
    }
}

/// Menu of actions legal for the current player turn.
fn available_actions(session: &BattleSession) -> Vec<ActionKind> {
    if session.phase != BattlePhase::AwaitingPlayerAction {
        return Vec::new();
    }
    let Some(actor) = session.current_actor().filter(|c| c.side == Side::Party) else {
        return Vec::new();
    };

    let mut menu = vec![ActionKind::Attack];
    if actor.spells.iter().any(|s| s.min_level <= actor.level) {
        menu.push(ActionKind::CastSpell);
    }
    if !actor.inventory.is_empty() {
        menu.push(ActionKind::UseItem);
    }
    menu.push(ActionKind::Defend);
    let boss_present = session.alive(Side::Enemy).any(|c| c.boss);
    if !boss_present {
        menu.push(ActionKind::Flee);
    }
    menu
}

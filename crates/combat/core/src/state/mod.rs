//! Battle state: combatant snapshots, inventory, session, and log.

mod combatant;
mod inventory;
mod log;
mod party;
mod session;

pub use combatant::{
    Combatant, CombatantId, HpMeter, Side, Spell, SpellEffect, StatKey, StatModifiers,
};
pub use inventory::{Inventory, ItemEffect, ItemStack};
pub use log::BattleLog;
pub use party::PartyMember;
pub use session::{BattlePhase, BattleSession, DefeatedMonster, TurnState, VictorySummary};

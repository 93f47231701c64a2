//! Deterministic turn-based combat rules shared across clients.
//!
//! `combat-core` defines the canonical battle rules (dice, combatants, actions,
//! the battle state machine, and reward progression) and exposes pure APIs that
//! can be reused by both the runtime and offline tools. All session mutation
//! flows through [`engine::BattleEngine`], and supporting crates depend on the
//! types re-exported here.
pub mod action;
pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod env;
pub mod progression;
pub mod state;

pub use action::{
    Action, ActionKind, ActionReport, ActionTransition, AttackAction, CastSpellAction,
    DefendAction, FleeAction, UseItemAction,
};
pub use config::BattleConfig;
pub use dice::DiceExpr;
pub use engine::{BattleEngine, ExecuteError, TransitionPhase, TransitionPhaseError};
pub use env::{
    CombatEnv, LevelTableOracle, MonsterOracle, MonsterTemplate, MonsterTemplateBuilder,
    OracleError, PcgRng, RngOracle, SequenceRng, SpellbookOracle, compute_seed,
};
pub use progression::{LevelRow, LevelTable, Progression, RewardReport, apply_rewards};
pub use state::{
    BattleLog, BattlePhase, BattleSession, Combatant, CombatantId, DefeatedMonster, HpMeter,
    Inventory, ItemEffect, ItemStack, PartyMember, Side, Spell, SpellEffect, StatKey,
    StatModifiers, TurnState, VictorySummary,
};

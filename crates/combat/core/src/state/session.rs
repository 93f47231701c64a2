//! Battle session state.
//!
//! A [`BattleSession`] is created per encounter and discarded once it reaches
//! a terminal phase. It exclusively owns its combatant snapshots (enemies are
//! cloned from templates, the party member from the persistent record), so
//! repeated encounters never share mutable state.

use crate::config::BattleConfig;
use crate::env::compute_seed;
use crate::state::combatant::{Combatant, CombatantId, Side};
use crate::state::log::BattleLog;

/// Battle state machine phases.
///
/// `Initializing -> AwaitingPlayerAction <-> AwaitingEnemyAction
///  -> (Victory | Defeat | Escaped)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    Initializing,
    AwaitingPlayerAction,
    AwaitingEnemyAction,
    Victory,
    Defeat,
    Escaped,
}

impl BattlePhase {
    /// Terminal phases accept no further actions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BattlePhase::Victory | BattlePhase::Defeat | BattlePhase::Escaped
        )
    }
}

/// Turn sequencing state: initiative order, cursor, round counter, and the
/// action nonce feeding roll seeds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Alive combatants in initiative order. Recomputed on every defeat.
    pub order: Vec<CombatantId>,
    /// Index into `order` of the combatant whose turn it is.
    pub cursor: usize,
    /// 1-based round counter; increments when the cursor wraps.
    pub round: u32,
    /// Increments once per executed action; mixed into roll seeds.
    pub nonce: u64,
}

impl TurnState {
    /// The combatant whose turn it is, if an order has been computed.
    pub fn current(&self) -> Option<CombatantId> {
        self.order.get(self.cursor).copied()
    }
}

/// A monster downed during the battle, reported to the bestiary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefeatedMonster {
    pub species: String,
    pub name: String,
    /// Whether at least one party attack landed, probing the armor class.
    pub ac_discovered: bool,
    pub drops: Vec<String>,
}

/// Spoils of a victorious battle, consumed by the reward engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VictorySummary {
    pub xp: u32,
    pub gold: u32,
    pub defeated: Vec<DefeatedMonster>,
}

/// One running encounter.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    /// Base seed for every roll in this battle.
    pub seed: u64,
    pub config: BattleConfig,
    pub phase: BattlePhase,
    pub turn: TurnState,
    pub log: BattleLog,
    combatants: Vec<Combatant>,
}

impl BattleSession {
    /// Open a session over the given combatant snapshots. Ids must be unique;
    /// the engine validates sides and computes the opening order in `start`.
    pub fn new(seed: u64, config: BattleConfig, combatants: Vec<Combatant>) -> Self {
        Self {
            seed,
            config,
            phase: BattlePhase::Initializing,
            turn: TurnState::default(),
            log: BattleLog::new(),
            combatants,
        }
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(move |c| c.side == side)
    }

    pub fn alive(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.side(side).filter(|c| c.is_alive())
    }

    /// First living combatant on a side (the enemy AI's default target).
    pub fn first_alive(&self, side: Side) -> Option<&Combatant> {
        self.alive(side).next()
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.alive(side).next().is_none()
    }

    /// The combatant whose turn it is.
    pub fn current_actor(&self) -> Option<&Combatant> {
        self.turn.current().and_then(|id| self.combatant(id))
    }

    /// Derive an independent roll seed for the current action.
    ///
    /// Mixes the battle seed, the action nonce, the acting combatant, and a
    /// per-roll context (0 = to-hit, 1 = effect dice, ...), so every roll in
    /// a replay lands identically.
    pub fn roll_seed(&self, context: u32) -> u64 {
        let actor = self.turn.current().map(|id| id.0).unwrap_or(u32::MAX);
        let base = self.seed ^ self.turn.nonce.wrapping_mul(0x9e3779b97f4a7c15);
        compute_seed(compute_seed(base, actor), context)
    }

    /// Spoils from every downed enemy. Meaningful once the phase is Victory,
    /// but computable at any time (escaped battles award nothing).
    pub fn victory_summary(&self) -> VictorySummary {
        let mut summary = VictorySummary {
            xp: 0,
            gold: 0,
            defeated: Vec::new(),
        };
        for enemy in self.side(Side::Enemy).filter(|c| !c.is_alive()) {
            summary.xp += enemy.xp_reward;
            summary.gold += enemy.gold_reward;
            summary.defeated.push(DefeatedMonster {
                species: enemy.species.clone().unwrap_or_else(|| enemy.name.clone()),
                name: enemy.name.clone(),
                ac_discovered: enemy.ac_discovered,
                drops: enemy.drops.clone(),
            });
        }
        summary
    }
}

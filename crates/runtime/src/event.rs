//! Events emitted by the runtime while a battle runs.

use combat_core::{ActionKind, BattlePhase, CombatantId, RewardReport, VictorySummary};

/// Events published on the runtime's broadcast channel.
///
/// Every executed action carries the narration lines produced by the combat
/// engine, in the order they were appended to the battle log.
#[derive(Debug, Clone)]
pub enum BattleEvent {
    /// The encounter opened and initiative was rolled.
    BattleStarted {
        seed: u64,
        enemies: Vec<String>,
        lines: Vec<String>,
    },
    /// The player's action resolved.
    PlayerActed {
        actor: CombatantId,
        kind: ActionKind,
        lines: Vec<String>,
    },
    /// An enemy took its automatic turn.
    EnemyActed {
        actor: CombatantId,
        lines: Vec<String>,
    },
    /// The state machine moved to a new phase.
    PhaseChanged { phase: BattlePhase },
    /// The battle reached a terminal phase. `summary` is present only on
    /// victory.
    BattleEnded {
        phase: BattlePhase,
        summary: Option<VictorySummary>,
    },
    /// Spoils were applied to the persistent party record.
    RewardsApplied { report: RewardReport },
}

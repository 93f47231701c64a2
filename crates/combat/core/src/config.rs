/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Threshold a `1d20 + dexterity` flee roll must meet or exceed.
    pub escape_threshold: i32,

    /// Temporary armor-class bonus granted by the defend stance.
    /// Lasts until the start of the defender's next turn.
    pub defend_bonus: i32,

    /// Damage multiplier applied on a natural-20 attack roll.
    pub crit_multiplier: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of spells a combatant can know.
    pub const MAX_SPELLS: usize = 8;
    /// Maximum number of item stacks in a combat inventory.
    pub const MAX_ITEM_STACKS: usize = 8;
    /// Maximum combatants per battle (party + enemies).
    pub const MAX_COMBATANTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ESCAPE_THRESHOLD: i32 = 12;
    pub const DEFAULT_DEFEND_BONUS: i32 = 2;
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 2;

    /// Number of log entries retained; older entries are dropped.
    pub const LOG_WINDOW: usize = 10;

    pub fn new() -> Self {
        Self {
            escape_threshold: Self::DEFAULT_ESCAPE_THRESHOLD,
            defend_bonus: Self::DEFAULT_DEFEND_BONUS,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

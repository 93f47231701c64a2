//! Weapon attack resolution: d20 to-hit plus damage dice.

use crate::config::BattleConfig;
use crate::dice::roll_notation;
use crate::env::RngOracle;
use crate::state::Combatant;

use super::damage::damage_amount;

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Natural 1: automatic miss, no damage roll.
    CriticalMiss,
    /// Attack roll fell short of the target's armor class.
    Miss,
    /// Attack roll met or beat the armor class.
    Hit,
    /// Natural 20: automatic hit, damage doubled.
    Critical,
}

impl AttackOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AttackOutcome::Hit | AttackOutcome::Critical)
    }
}

/// Result of a complete attack resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// The raw d20 face.
    pub natural: u32,
    /// d20 face plus the attacker's attack bonus.
    pub attack_roll: i32,
    /// Damage dealt; `None` on a miss.
    pub damage: Option<u32>,
}

/// Resolve a weapon attack: `1d20 + attack bonus` vs the defender's
/// effective armor class (defend stance included).
///
/// A natural 1 short-circuits without a damage roll; a natural 20 hits
/// regardless of AC and multiplies the total damage by the configured
/// critical multiplier. On a hit, damage is the attacker's weapon dice plus
/// damage modifier, floored at zero.
///
/// `hit_seed` and `damage_seed` must be independent (different roll
/// contexts) so forcing one roll under test never disturbs the other.
pub fn resolve_attack(
    attacker: &Combatant,
    defender: &Combatant,
    config: &BattleConfig,
    rng: &(impl RngOracle + ?Sized),
    hit_seed: u64,
    damage_seed: u64,
) -> AttackResult {
    let natural = rng.roll_die(hit_seed, 20);
    let attack_roll = natural as i32 + attacker.attack_bonus;

    let outcome = match natural {
        1 => AttackOutcome::CriticalMiss,
        20 => AttackOutcome::Critical,
        _ if attack_roll >= defender.effective_ac() => AttackOutcome::Hit,
        _ => AttackOutcome::Miss,
    };

    let damage = match outcome {
        AttackOutcome::CriticalMiss | AttackOutcome::Miss => None,
        AttackOutcome::Hit | AttackOutcome::Critical => {
            let roll = roll_notation(&attacker.weapon_dice, rng, damage_seed)
                + attacker.damage_modifier;
            let mut total = damage_amount(roll);
            if outcome == AttackOutcome::Critical {
                total *= config.crit_multiplier;
            }
            Some(total)
        }
    };

    AttackResult {
        outcome,
        natural,
        attack_roll,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;
    use crate::state::test_support::{enemy, player};

    fn resolve(faces: &[u32]) -> AttackResult {
        let rng = SequenceRng::from_faces(faces.iter().copied());
        resolve_attack(&player(), &enemy(1, "Goblin"), &BattleConfig::default(), &rng, 0, 1)
    }

    #[test]
    fn hit_when_roll_meets_ac() {
        // attack_bonus 4, enemy AC 12: a 15 hits; 1d8=5 + modifier 2 = 7.
        let result = resolve(&[15, 5]);
        assert_eq!(result.outcome, AttackOutcome::Hit);
        assert_eq!(result.attack_roll, 19);
        assert_eq!(result.damage, Some(7));
    }

    #[test]
    fn miss_below_ac_rolls_no_damage() {
        let rng = SequenceRng::from_faces([5]);
        let result = resolve_attack(
            &player(),
            &enemy(1, "Goblin"),
            &BattleConfig::default(),
            &rng,
            0,
            1,
        );
        assert_eq!(result.outcome, AttackOutcome::Miss);
        assert_eq!(result.damage, None);
        // The damage die was never consumed.
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn natural_one_always_misses() {
        // 1 + 4 = 5 would miss anyway, but even vs AC 1 the natural 1 misses.
        let mut target = enemy(1, "Slime");
        target.armor_class = 1;
        let rng = SequenceRng::from_faces([1]);
        let result =
            resolve_attack(&player(), &target, &BattleConfig::default(), &rng, 0, 1);
        assert_eq!(result.outcome, AttackOutcome::CriticalMiss);
        assert_eq!(result.damage, None);
    }

    #[test]
    fn natural_twenty_doubles_damage() {
        // 1d8=3 + 2 = 5, doubled to 10.
        let result = resolve(&[20, 3]);
        assert_eq!(result.outcome, AttackOutcome::Critical);
        assert_eq!(result.damage, Some(10));
    }

    #[test]
    fn defend_bonus_raises_effective_ac() {
        let mut target = enemy(1, "Goblin");
        target.defend_bonus = 2;
        // 10 + 4 = 14 meets AC 12 but not 12 + 2.
        let rng = SequenceRng::from_faces([10]);
        let result =
            resolve_attack(&player(), &target, &BattleConfig::default(), &rng, 0, 1);
        assert_eq!(result.outcome, AttackOutcome::Miss);
    }
}

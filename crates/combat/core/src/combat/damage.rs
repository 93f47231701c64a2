//! Roll-to-amount conversions.
//!
//! Dice results are signed (modifiers can pull them below zero); HP mutation
//! is unsigned. These helpers apply the flooring policy in one place.

/// Damage applied from a roll: negative totals deal nothing.
pub fn damage_amount(roll: i32) -> u32 {
    roll.max(0) as u32
}

/// Healing applied from a roll. Heal items always restore at least 1 HP.
pub fn heal_amount(roll: i32, minimum: u32) -> u32 {
    (roll.max(0) as u32).max(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero() {
        assert_eq!(damage_amount(-3), 0);
        assert_eq!(damage_amount(0), 0);
        assert_eq!(damage_amount(7), 7);
    }

    #[test]
    fn heal_respects_minimum() {
        assert_eq!(heal_amount(-2, 1), 1);
        assert_eq!(heal_amount(0, 1), 1);
        assert_eq!(heal_amount(4, 1), 4);
        assert_eq!(heal_amount(0, 0), 0);
    }
}

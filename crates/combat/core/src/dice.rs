//! Dice-notation parsing and evaluation.
//!
//! Combat content references rolls as notation strings (`"2d6+2"`, `"1d20"`,
//! `"1d8-1"`). This module parses them into [`DiceExpr`] and evaluates them
//! against an injectable [`RngOracle`], which keeps every roll deterministic
//! under test.
//!
//! # Grammar
//!
//! ```text
//! <count> "d" <sides> [ ("+" | "-") <modifier> ]
//! ```
//!
//! Malformed notation never halts combat: [`roll_notation`] degrades to a
//! zero roll so bad content data stays a diagnostic, not a crash.

use crate::env::{RngOracle, compute_seed};

/// A parsed dice expression: `count` dice of `sides` faces plus a flat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse dice notation. Returns `None` for malformed input, including a
    /// zero die count or zero-sided dice.
    pub fn parse(notation: &str) -> Option<Self> {
        let trimmed = notation.trim();
        let (count_str, rest) = trimmed.split_once(['d', 'D'])?;

        let (sides_str, modifier) = if let Some(idx) = rest.find(['+', '-']) {
            let (sides_str, mod_str) = rest.split_at(idx);
            (sides_str, mod_str.replace(' ', "").parse::<i32>().ok()?)
        } else {
            (rest, 0)
        };

        let count: u32 = count_str.trim().parse().ok()?;
        let sides: u32 = sides_str.trim().parse().ok()?;
        if count == 0 || sides == 0 {
            return None;
        }

        Some(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Smallest value this expression can roll.
    pub fn min(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    /// Largest value this expression can roll.
    pub fn max(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }

    /// Evaluate the expression: sum `count` independent uniform draws in
    /// `[1, sides]`, then add the signed modifier.
    ///
    /// Each die derives its own seed from `seed` and the die index, so a
    /// single expression consumes independent draws without the caller
    /// tracking per-die state.
    pub fn roll(&self, rng: &(impl RngOracle + ?Sized), seed: u64) -> i32 {
        let mut total = 0i32;
        for die in 0..self.count {
            total += rng.roll_die(compute_seed(seed, die), self.sides) as i32;
        }
        total + self.modifier
    }
}

impl core::fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier.cmp(&0) {
            core::cmp::Ordering::Greater => write!(f, "+{}", self.modifier),
            core::cmp::Ordering::Less => write!(f, "{}", self.modifier),
            core::cmp::Ordering::Equal => Ok(()),
        }
    }
}

/// Parse and roll in one step.
///
/// Malformed notation deterministically yields 0. The result may be zero or
/// negative when the modifier pulls it down; callers floor as appropriate.
pub fn roll_notation(notation: &str, rng: &(impl RngOracle + ?Sized), seed: u64) -> i32 {
    match DiceExpr::parse(notation) {
        Some(expr) => expr.roll(rng, seed),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SequenceRng};

    #[test]
    fn parses_basic_notation() {
        assert_eq!(DiceExpr::parse("2d6+2"), Some(DiceExpr::new(2, 6, 2)));
        assert_eq!(DiceExpr::parse("1d20"), Some(DiceExpr::new(1, 20, 0)));
        assert_eq!(DiceExpr::parse("1d8-1"), Some(DiceExpr::new(1, 8, -1)));
    }

    #[test]
    fn tolerates_whitespace_and_capital_d() {
        assert_eq!(DiceExpr::parse(" 2D6 + 2 "), Some(DiceExpr::new(2, 6, 2)));
    }

    #[test]
    fn rejects_malformed_notation() {
        for bad in ["", "d6", "2d", "2x6", "0d6", "2d0", "2d6++2", "ad6"] {
            assert_eq!(DiceExpr::parse(bad), None, "expected reject: {bad:?}");
        }
    }

    #[test]
    fn malformed_notation_rolls_zero() {
        let rng = PcgRng;
        assert_eq!(roll_notation("garbage", &rng, 1), 0);
        assert_eq!(roll_notation("0d6", &rng, 1), 0);
    }

    #[test]
    fn roll_stays_within_bounds() {
        let rng = PcgRng;
        let expr = DiceExpr::parse("3d6+2").unwrap();
        for seed in 0..200 {
            let value = expr.roll(&rng, seed);
            assert!(value >= expr.min() && value <= expr.max());
        }
    }

    #[test]
    fn negative_modifier_can_go_below_one() {
        // Forced ones: 2d4-3 rolls 1+1-3 = -1.
        let rng = SequenceRng::from_faces([1, 1]);
        let expr = DiceExpr::parse("2d4-3").unwrap();
        assert_eq!(expr.roll(&rng, 0), -1);
    }

    #[test]
    fn forced_faces_sum_exactly() {
        let rng = SequenceRng::from_faces([2, 5]);
        assert_eq!(roll_notation("2d6+2", &rng, 0), 9);
    }

    #[test]
    fn display_round_trips() {
        for text in ["2d6+2", "1d20", "1d8-1"] {
            assert_eq!(DiceExpr::parse(text).unwrap().to_string(), text);
        }
    }
}

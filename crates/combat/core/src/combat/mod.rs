//! Combat resolution primitives.
//!
//! Pure, side-effect-free functions used by the action transitions: the d20
//! to-hit check with critical handling, and the roll-to-amount conversions
//! that floor damage and heals. All randomness comes in through seeds and the
//! [`RngOracle`](crate::env::RngOracle), never ambient state.

mod attack;
mod damage;

pub use attack::{AttackOutcome, AttackResult, resolve_attack};
pub use damage::{damage_amount, heal_amount};

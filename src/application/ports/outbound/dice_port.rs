//! Dice port - source of randomness for turn resolution

use rand::Rng;

use crate::domain::value_objects::{D20Roll, D20_MAX, D20_MIN};

/// Draws D20 rolls; swapped for a deterministic double in tests
#[cfg_attr(test, mockall::automock)]
pub trait DiceRollerPort: Send + Sync {
    fn roll_d20(&self) -> D20Roll;
}

/// Uniform rolls from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDice;

impl DiceRollerPort for ThreadRngDice {
    fn roll_d20(&self) -> D20Roll {
        let value = rand::thread_rng().gen_range(D20_MIN..=D20_MAX);
        D20Roll::saturating(value)
    }
}

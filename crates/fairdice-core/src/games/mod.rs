//! Dice definitions and probability engine.

mod dice;
mod probability;

pub use dice::{ConfigError, Dice, DiceError, DiceSet};
pub use probability::{pair_win_probability, winning_probabilities, PairOdds};

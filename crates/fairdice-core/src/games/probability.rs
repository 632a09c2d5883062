//! Pairwise win probabilities over a dice set.
//!
//! The "beats" relation between dice is non-transitive, so the table
//! covers every ordered pair in both directions. Ties count for
//! neither side, which is why opposite directions need not sum to 1.

use super::dice::{Dice, DiceSet};
use serde::{Deserialize, Serialize};

/// Win probability for one ordered pair of dice in the set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairOdds {
    /// Index of the throwing dice in the set
    pub a: usize,
    /// Index of the opposing dice in the set
    pub b: usize,
    /// Fraction of face pairings where `a`'s face strictly beats `b`'s
    pub win_probability: f64,
}

/// Probability that `a` strictly beats `b` over all face pairings
pub fn pair_win_probability(a: &Dice, b: &Dice) -> f64 {
    let total = (a.sides() * b.sides()) as f64;
    let mut wins = 0usize;
    for &face_a in a.values() {
        for &face_b in b.values() {
            if face_a > face_b {
                wins += 1;
            }
        }
    }
    wins as f64 / total
}

/// Win probabilities for every ordered pair `(a, b)` with `a != b`,
/// in row-major index order
pub fn winning_probabilities(set: &DiceSet) -> Vec<PairOdds> {
    let dice = set.dice();
    let mut table = Vec::with_capacity(dice.len() * (dice.len() - 1));
    for (i, a) in dice.iter().enumerate() {
        for (j, b) in dice.iter().enumerate() {
            if i != j {
                table.push(PairOdds {
                    a: i,
                    b: j,
                    win_probability: pair_win_probability(a, b),
                });
            }
        }
    }
    table
}

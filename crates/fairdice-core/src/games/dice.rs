//! Dice value objects and startup configuration validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from dice operations
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("face index {index} is outside 0..{sides}")]
    IndexOutOfRange { index: usize, sides: usize },
}

/// Errors from an invalid startup dice configuration.
///
/// All of these are fatal: the game never starts with a bad set.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least 3 dice are required, got {found}; for example: 1,2,3,4,5,6 1,2,3,4,5,6 1,2,3,4,5,6")]
    TooFewDice { found: usize },

    #[error("dice \"{spec}\" contains a non-integer face; all faces must be integers, for example: 1,2,3,4,5,6")]
    NonIntegerFace { spec: String },

    #[error("dice \"{spec}\" must have at least 2 faces, for example: 1,2")]
    TooFewFaces { spec: String },

    #[error("all dice must have the same number of faces; expected {expected}, got {found}")]
    MismatchedSides { expected: usize, found: usize },
}

/// An immutable ordered list of face values.
///
/// Faces are fixed at construction; a dice is a pure value object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    values: Vec<i64>,
}

impl Dice {
    /// Create a dice from its face values (at least 2)
    pub fn new(values: Vec<i64>) -> Result<Self, ConfigError> {
        if values.len() < 2 {
            return Err(ConfigError::TooFewFaces {
                spec: join_faces(&values),
            });
        }
        Ok(Self { values })
    }

    /// Face value at `face_index`
    pub fn roll(&self, face_index: usize) -> Result<i64, DiceError> {
        self.values
            .get(face_index)
            .copied()
            .ok_or(DiceError::IndexOutOfRange {
                index: face_index,
                sides: self.values.len(),
            })
    }

    /// Number of faces
    pub fn sides(&self) -> usize {
        self.values.len()
    }

    /// Read-only view of the face values
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_faces(&self.values))
    }
}

fn join_faces(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// A validated collection of dice.
///
/// At least 3 dice, all with the same side count; checked once here
/// and assumed everywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSet {
    dice: Vec<Dice>,
}

impl DiceSet {
    /// Validate and wrap a list of dice
    pub fn new(dice: Vec<Dice>) -> Result<Self, ConfigError> {
        if dice.len() < 3 {
            return Err(ConfigError::TooFewDice { found: dice.len() });
        }
        let expected = dice[0].sides();
        for d in &dice[1..] {
            if d.sides() != expected {
                return Err(ConfigError::MismatchedSides {
                    expected,
                    found: d.sides(),
                });
            }
        }
        Ok(Self { dice })
    }

    /// Parse startup dice specs, one comma-separated integer list each
    pub fn parse(specs: &[String]) -> Result<Self, ConfigError> {
        if specs.len() < 3 {
            return Err(ConfigError::TooFewDice { found: specs.len() });
        }
        let mut dice = Vec::with_capacity(specs.len());
        for spec in specs {
            let mut values = Vec::new();
            for part in spec.split(',') {
                let face: i64 = part
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::NonIntegerFace { spec: spec.clone() })?;
                values.push(face);
            }
            if values.len() < 2 {
                return Err(ConfigError::TooFewFaces { spec: spec.clone() });
            }
            dice.push(Dice { values });
        }
        Self::new(dice)
    }

    /// Number of dice in the set
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Side count shared by every dice in the set
    pub fn sides(&self) -> usize {
        self.dice[0].sides()
    }

    /// The dice in their configured order
    pub fn dice(&self) -> &[Dice] {
        &self.dice
    }

    /// The dice at `index`, plus the rest in order.
    ///
    /// Used when one party claims a dice and the other chooses from
    /// what is left.
    pub fn split_at_pick(&self, index: usize) -> Result<(Dice, Vec<Dice>), DiceError> {
        if index >= self.dice.len() {
            return Err(DiceError::IndexOutOfRange {
                index,
                sides: self.dice.len(),
            });
        }
        let picked = self.dice[index].clone();
        let rest = self
            .dice
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, d)| d.clone())
            .collect();
        Ok((picked, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_roll_returns_face_value() {
        let dice = Dice::new(vec![2, 2, 4, 4, 9, 9]).unwrap();
        for (i, &face) in dice.values().iter().enumerate() {
            assert_eq!(dice.roll(i).unwrap(), face);
        }
    }

    #[test]
    fn test_roll_out_of_range_fails() {
        let dice = Dice::new(vec![1, 2]).unwrap();
        assert!(matches!(
            dice.roll(2),
            Err(DiceError::IndexOutOfRange { index: 2, sides: 2 })
        ));
    }

    #[test]
    fn test_dice_needs_two_faces() {
        assert!(matches!(
            Dice::new(vec![7]),
            Err(ConfigError::TooFewFaces { .. })
        ));
    }

    #[test]
    fn test_parse_valid_set() {
        let set = DiceSet::parse(&specs(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"])).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.sides(), 6);
        assert_eq!(set.dice()[1].values(), &[1, 1, 6, 6, 8, 8]);
    }

    #[test]
    fn test_parse_accepts_negative_faces_and_spaces() {
        let set = DiceSet::parse(&specs(&["-1, 2", "3,4", "5,6"])).unwrap();
        assert_eq!(set.dice()[0].values(), &[-1, 2]);
    }

    #[test]
    fn test_parse_too_few_dice() {
        let err = DiceSet::parse(&specs(&["1,2,3", "4,5,6"])).unwrap_err();
        assert!(matches!(err, ConfigError::TooFewDice { found: 2 }));
    }

    #[test]
    fn test_parse_non_integer_face() {
        let err = DiceSet::parse(&specs(&["1,2,3", "4,x,6", "7,8,9"])).unwrap_err();
        assert!(matches!(err, ConfigError::NonIntegerFace { .. }));
    }

    #[test]
    fn test_parse_too_few_faces() {
        let err = DiceSet::parse(&specs(&["1,2", "3", "4,5"])).unwrap_err();
        assert!(matches!(err, ConfigError::TooFewFaces { .. }));
    }

    #[test]
    fn test_parse_mismatched_sides() {
        let err = DiceSet::parse(&specs(&["1,2,3", "4,5,6", "7,8"])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MismatchedSides {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_split_at_pick() {
        let set = DiceSet::parse(&specs(&["1,2", "3,4", "5,6"])).unwrap();
        let (picked, rest) = set.split_at_pick(1).unwrap();
        assert_eq!(picked.values(), &[3, 4]);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].values(), &[1, 2]);
        assert_eq!(rest[1].values(), &[5, 6]);
    }

    #[test]
    fn test_split_at_pick_out_of_range() {
        let set = DiceSet::parse(&specs(&["1,2", "3,4", "5,6"])).unwrap();
        assert!(set.split_at_pick(3).is_err());
    }

    #[test]
    fn test_display() {
        let dice = Dice::new(vec![2, 2, 4]).unwrap();
        assert_eq!(dice.to_string(), "2,2,4");
    }
}

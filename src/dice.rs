//! Dice rolls.
//!
//! The engine never rolls on its own: callers hand it values produced by
//! whatever source they trust. [`Dice::roll`] is a convenience for drivers
//! that are happy with `fastrand`.

use std::fmt;

use thiserror::Error;

use crate::constants::{DIE_MAX, DIE_MIN, DOUBLE_MOVES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("die value {0} is outside 1..=6")]
pub struct DiceError(pub u8);

/// Check a single die face.
pub fn validate_die(value: u8) -> Result<u8, DiceError> {
    if (DIE_MIN..=DIE_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(DiceError(value))
    }
}

/// A roll of two dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dice {
    values: [u8; 2],
}

impl Dice {
    pub fn new(first: u8, second: u8) -> Result<Self, DiceError> {
        Ok(Dice {
            values: [validate_die(first)?, validate_die(second)?],
        })
    }

    /// Roll two fair dice.
    pub fn roll(rng: &mut fastrand::Rng) -> Self {
        Dice {
            values: [rng.u8(DIE_MIN..=DIE_MAX), rng.u8(DIE_MIN..=DIE_MAX)],
        }
    }

    pub fn values(self) -> [u8; 2] {
        self.values
    }

    pub fn is_double(self) -> bool {
        self.values[0] == self.values[1]
    }

    /// Usable move distances: the two faces, or four copies of a double.
    pub fn distances(self) -> Vec<u8> {
        if self.is_double() {
            vec![self.values[0]; DOUBLE_MOVES]
        } else {
            self.values.to_vec()
        }
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.values[0], self.values[1])
    }
}

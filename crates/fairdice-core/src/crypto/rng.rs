//! Random source capability.
//!
//! The game needs two kinds of randomness: secret key material for
//! commitments and uniform draws for host numbers and dice picks. Both
//! go through this trait so tests can script every draw.

use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// Source of randomness for the game
pub trait RandomSource {
    /// Fill `buf` with cryptographically unpredictable bytes
    fn fill_secret(&mut self, buf: &mut [u8]);

    /// Draw a uniform value in `[0, upper)`; `upper` must be > 0
    fn draw(&mut self, upper: u64) -> u64;
}

/// Production random source backed by the thread-local CSPRNG
#[derive(Clone, Debug, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn fill_secret(&mut self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }

    fn draw(&mut self, upper: u64) -> u64 {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Scripted random source for tests.
///
/// Draws are served from a fixed queue; secret bytes are a constant
/// pattern so commitments stay reproducible.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<u64>,
}

impl ScriptedRandom {
    /// Create a source that serves the given draws in order
    pub fn new(draws: impl IntoIterator<Item = u64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Number of scripted draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn fill_secret(&mut self, buf: &mut [u8]) {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = 0xA5 ^ (i as u8);
        }
    }

    fn draw(&mut self, upper: u64) -> u64 {
        let value = self
            .draws
            .pop_front()
            .expect("ScriptedRandom ran out of draws");
        assert!(value < upper, "scripted draw {} outside 0..{}", value, upper);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_draw_in_range() {
        let mut rng = SystemRandom;
        for _ in 0..100 {
            assert!(rng.draw(6) < 6);
        }
    }

    #[test]
    fn test_system_fill_secret_not_all_zero() {
        let mut rng = SystemRandom;
        let mut buf = [0u8; 32];
        rng.fill_secret(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_scripted_draws_in_order() {
        let mut rng = ScriptedRandom::new([1, 0, 4]);
        assert_eq!(rng.draw(2), 1);
        assert_eq!(rng.draw(3), 0);
        assert_eq!(rng.draw(6), 4);
        assert_eq!(rng.remaining(), 0);
    }
}

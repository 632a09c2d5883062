//! Cryptographic primitives for the fairdice protocol.
//!
//! This module provides:
//! - Salt and Commitment for the keyed-hash commit-reveal scheme
//! - FairExchange, one verifiable commit-reveal round
//! - RandomSource, the injected randomness capability

mod commitment;
mod exchange;
mod rng;

pub use commitment::{Commitment, Salt};
pub use exchange::{ExchangeError, FairExchange, Reveal};
pub use rng::{RandomSource, ScriptedRandom, SystemRandom};

//! Fairdice Core Library
//!
//! This crate provides the commit-reveal fairness protocol, the dice
//! probability engine, and the game session state machine for the
//! provably-fair non-transitive dice game.

pub mod crypto;
pub mod games;
pub mod protocol;

pub use crypto::{Commitment, ExchangeError, FairExchange, RandomSource, Reveal, Salt, SystemRandom};
pub use games::{winning_probabilities, ConfigError, Dice, DiceError, DiceSet, PairOdds};
pub use protocol::{
    ExchangeRecord, ExchangeStage, GameEvent, GameId, GameOutcome, GameReport, GameSession,
    InputProvider, OutputSink, Party, Selection, SessionEnd, SessionError,
};

//! Typed events and the verification transcript.
//!
//! Every observable moment of a session is emitted as a [`GameEvent`]
//! to the injected output sink, and every commit-reveal round is kept
//! as an [`ExchangeRecord`] so the counterparty can re-check each
//! commitment once the game is over.

use crate::crypto::{Commitment, Reveal};
use crate::games::{Dice, PairOdds};
use crate::protocol::types::{GameId, GameOutcome, Party};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which decision an exchange settles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeStage {
    /// The range-2 coin for who moves first
    FirstMover,
    /// A throw of the given party's dice
    Throw(Party),
}

impl fmt::Display for ExchangeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeStage::FirstMover => write!(f, "first mover"),
            ExchangeStage::Throw(party) => write!(f, "{} throw", party),
        }
    }
}

/// One completed exchange in the transcript
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub stage: ExchangeStage,
    pub reveal: Reveal,
}

impl ExchangeRecord {
    /// Recompute the keyed hash against the disclosed commitment
    pub fn verify(&self) -> bool {
        self.reveal.verify()
    }
}

/// Events emitted to the output sink as a session progresses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameEvent {
    /// A commitment was published; the counterparty's number is due
    ExchangeCommitted {
        stage: ExchangeStage,
        range: u64,
        commitment: Commitment,
    },
    /// The host disclosed its number and salt for an exchange
    ExchangeRevealed { stage: ExchangeStage, reveal: Reveal },
    /// The coin decided who moves first
    FirstMoverDecided { first_mover: Party },
    /// The host claimed a dice
    HostDicePicked { dice: Dice },
    /// The user claimed a dice
    UserDicePicked { dice: Dice },
    /// A combined result was mapped onto a dice face
    ThrowResolved { party: Party, face_value: i64 },
    /// Help: the full pairwise win probability table
    ProbabilityTable {
        dice: Vec<Dice>,
        odds: Vec<PairOdds>,
    },
    /// Terminal verdict
    GameFinished {
        outcome: GameOutcome,
        host_throw: i64,
        user_throw: i64,
    },
}

/// Everything a completed game discloses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameReport {
    pub id: GameId,
    pub first_mover: Party,
    pub host_dice: Dice,
    pub user_dice: Dice,
    pub host_throw: i64,
    pub user_throw: i64,
    pub outcome: GameOutcome,
    pub exchanges: Vec<ExchangeRecord>,
}

impl GameReport {
    /// Check every recorded commitment against its reveal
    pub fn verify_exchanges(&self) -> bool {
        self.exchanges.iter().all(ExchangeRecord::verify)
    }
}

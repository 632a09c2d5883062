//! One commit-reveal round producing a verifiable shared random value.
//!
//! The host commits to a uniformly drawn number before the counterparty
//! contributes theirs; the combined result `(host + user) mod range`
//! is therefore uniform no matter how the counterparty chooses. After
//! the reveal the counterparty recomputes the keyed hash to check the
//! host did not switch numbers.

use super::commitment::{Commitment, Salt};
use super::rng::RandomSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a fair exchange
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("exchange range must be at least 1")]
    EmptyRange,

    #[error("contribution {value} is outside 0..{range}")]
    InvalidContribution { value: u64, range: u64 },

    #[error("contribution already recorded for this exchange")]
    AlreadyContributed,

    #[error("cannot reveal before a contribution is recorded")]
    MissingContribution,
}

/// A single commit-reveal exchange.
///
/// Lifecycle: [`FairExchange::commit`] → [`FairExchange::contribute`] →
/// [`FairExchange::reveal`]. Reveal consumes the exchange; a round is
/// never reused.
#[derive(Debug)]
pub struct FairExchange {
    range: u64,
    host_number: u64,
    salt: Salt,
    commitment: Commitment,
    user_number: Option<u64>,
}

impl FairExchange {
    /// Open an exchange over `[0, range)`.
    ///
    /// Draws the host number and a fresh salt, and fixes the
    /// commitment. Only the commitment may be disclosed before the
    /// counterparty has contributed.
    pub fn commit(range: u64, rng: &mut dyn RandomSource) -> Result<Self, ExchangeError> {
        if range == 0 {
            return Err(ExchangeError::EmptyRange);
        }
        let host_number = rng.draw(range);
        let salt = Salt::generate(rng);
        let commitment = Commitment::over_number(host_number, &salt);
        Ok(Self {
            range,
            host_number,
            salt,
            commitment,
            user_number: None,
        })
    }

    /// Exclusive upper bound of the exchange
    pub fn range(&self) -> u64 {
        self.range
    }

    /// The public commitment to the host number
    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Record the counterparty's number
    pub fn contribute(&mut self, user_number: u64) -> Result<(), ExchangeError> {
        if user_number >= self.range {
            return Err(ExchangeError::InvalidContribution {
                value: user_number,
                range: self.range,
            });
        }
        if self.user_number.is_some() {
            return Err(ExchangeError::AlreadyContributed);
        }
        self.user_number = Some(user_number);
        Ok(())
    }

    /// Disclose the host number and salt and compute the combined result
    pub fn reveal(self) -> Result<Reveal, ExchangeError> {
        let user_number = self.user_number.ok_or(ExchangeError::MissingContribution)?;
        let combined = (self.host_number + user_number) % self.range;
        Ok(Reveal {
            range: self.range,
            host_number: self.host_number,
            salt: self.salt,
            user_number,
            combined,
            commitment: self.commitment,
        })
    }
}

/// Everything disclosed at the end of an exchange
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reveal {
    pub range: u64,
    pub host_number: u64,
    pub salt: Salt,
    pub user_number: u64,
    /// `(host_number + user_number) mod range`
    pub combined: u64,
    pub commitment: Commitment,
}

impl Reveal {
    /// Recompute the keyed hash and compare it to the commitment.
    ///
    /// Advisory: a mismatch is evidence the host cheated, not a fault
    /// the protocol acts on.
    pub fn verify(&self) -> bool {
        self.commitment.verify(self.host_number, &self.salt)
    }

    /// Whether the counterparty's number equals the revealed host
    /// number (the comparison used by the first-mover coin exchange)
    pub fn guess_matches(&self) -> bool {
        self.user_number == self.host_number
    }
}

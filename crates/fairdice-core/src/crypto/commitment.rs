//! Salt and keyed-hash commitment for the commit-reveal scheme.

use super::rng::RandomSource;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Secret key material binding one commitment.
///
/// Generated fresh for every exchange and never reused; disclosed only
/// at reveal time so the counterparty can recompute the digest.
#[derive(Clone, Serialize, Deserialize)]
pub struct Salt([u8; 32]);

impl Salt {
    /// Draw a fresh salt from the given random source
    pub fn generate(rng: &mut dyn RandomSource) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_secret(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Commitment = H(number || salt)
///
/// Published before the counterparty contributes anything, which pins
/// the committed number without revealing it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Commit to a number in big-endian form under the given salt
    pub fn over_number(number: u64, salt: &Salt) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(number.to_be_bytes());
        hasher.update(salt.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given number and salt produce this commitment
    pub fn verify(&self, number: u64, salt: &Salt) -> bool {
        *self == Self::over_number(number, salt)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

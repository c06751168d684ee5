use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

pub const SECRET_LENGTH: usize = 32;

/// The preimage that unlocks both HTLCs of a swap.
///
/// Generated by the initiator and kept private until they redeem; the
/// responder only ever learns it from an observed on-chain redeem
/// transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret(#[serde(with = "hex::serde")] [u8; SECRET_LENGTH]);

impl Secret {
    pub fn generate<R: RngCore>(rng: &mut R) -> Secret {
        let mut bytes = [0u8; SECRET_LENGTH];
        rng.fill_bytes(&mut bytes);
        Secret(bytes)
    }

    pub fn from_vec(vec: &[u8]) -> Result<Secret, FromErr> {
        if vec.len() != SECRET_LENGTH {
            return Err(FromErr::InvalidLength {
                expected: SECRET_LENGTH,
                got: vec.len(),
            });
        }
        let mut data = [0u8; SECRET_LENGTH];
        data.copy_from_slice(vec);
        Ok(Secret(data))
    }

    pub fn hash(&self) -> SecretHash {
        SecretHash::new(*self)
    }

    pub fn as_raw_secret(&self) -> &[u8; SECRET_LENGTH] {
        &self.0
    }
}

impl From<[u8; SECRET_LENGTH]> for Secret {
    fn from(secret: [u8; SECRET_LENGTH]) -> Self {
        Secret(secret)
    }
}

impl FromStr for Secret {
    type Err = FromErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vec = hex::decode(s)?;
        Secret::from_vec(&vec)
    }
}

impl fmt::LowerHex for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({:x})", self)
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FromErr {
    #[error("invalid length, expected: {expected}, got: {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("invalid hex: {0}")]
    FromHex(#[from] hex::FromHexError),
}

/// SHA-256 hash of a [`Secret`], committed to by both HTLCs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretHash(#[serde(with = "hex::serde")] [u8; SECRET_LENGTH]);

impl SecretHash {
    pub fn new(secret: Secret) -> Self {
        let digest = Sha256::digest(secret.as_raw_secret());
        let mut hash = [0u8; SECRET_LENGTH];
        hash.copy_from_slice(&digest);
        SecretHash(hash)
    }

    pub fn as_raw(&self) -> &[u8; SECRET_LENGTH] {
        &self.0
    }
}

impl From<Secret> for SecretHash {
    fn from(secret: Secret) -> Self {
        SecretHash::new(secret)
    }
}

impl From<[u8; SECRET_LENGTH]> for SecretHash {
    fn from(hash: [u8; SECRET_LENGTH]) -> Self {
        SecretHash(hash)
    }
}

impl FromStr for SecretHash {
    type Err = FromErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vec = hex::decode(s)?;
        if vec.len() != SECRET_LENGTH {
            return Err(FromErr::InvalidLength {
                expected: SECRET_LENGTH,
                got: vec.len(),
            });
        }
        let mut data = [0u8; SECRET_LENGTH];
        data.copy_from_slice(&vec);
        Ok(SecretHash(data))
    }
}

impl fmt::LowerHex for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Display for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self)
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretHash({:x})", self)
    }
}

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifies a confirmed ledger transaction.
///
/// Used to tell an exact replay of an event apart from a conflicting one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(#[serde(with = "hex::serde")] Vec<u8>);

impl TransactionId {
    pub fn new(bytes: Vec<u8>) -> Self {
        TransactionId(bytes)
    }
}

impl From<Vec<u8>> for TransactionId {
    fn from(bytes: Vec<u8>) -> Self {
        TransactionId(bytes)
    }
}

impl FromStr for TransactionId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(TransactionId)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self)
    }
}

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The on-chain location of a deployed HTLC instance.
///
/// Depending on the ledger this is a contract address, an outpoint or a
/// script hash; the core only ever compares locators for equality and hands
/// them back to the ledger collaborators.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator(#[serde(with = "hex::serde")] Vec<u8>);

impl Locator {
    pub fn new(bytes: Vec<u8>) -> Self {
        Locator(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Locator {
    fn from(bytes: Vec<u8>) -> Self {
        Locator(bytes)
    }
}

impl FromStr for Locator {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Locator)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator({})", self)
    }
}

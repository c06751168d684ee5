use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An on-ledger identity (address, public key, ...) owned by one of the
/// parties.
///
/// The core never interprets identities; they are opaque bytes that are
/// handed back to the ledger collaborators as action parameters. Hex encoded
/// wherever they are rendered or serialized.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(#[serde(with = "hex::serde")] Vec<u8>);

impl Identity {
    pub fn new(bytes: Vec<u8>) -> Self {
        Identity(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Identity {
    fn from(bytes: Vec<u8>) -> Self {
        Identity(bytes)
    }
}

impl FromStr for Identity {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Identity)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}

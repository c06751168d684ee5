use crate::asset::{Asset, AssetKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The network a ledger instance runs on.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Dev,
}

impl Default for Network {
    fn default() -> Self {
        Network::Main
    }
}

/// The ledgers a swap can be composed of.
///
/// A closed enumeration with exhaustive matching at the deriver and the
/// action resolver, so adding a ledger type is a compile-time checked
/// extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Ledger {
    Bitcoin { network: Network },
    Ethereum { chain_id: u32 },
}

impl Ledger {
    /// Whether this ledger can hold an HTLC for the given asset.
    ///
    /// Token assets need an account-based ledger with contract support.
    pub fn supports(&self, asset: &Asset) -> bool {
        match (self, asset.kind()) {
            (Ledger::Ethereum { .. }, AssetKind::Token) => true,
            (Ledger::Bitcoin { .. }, AssetKind::Token) => false,
            (_, AssetKind::Native) => true,
        }
    }

    /// Whether redeeming on this ledger requires the caller to choose a fee
    /// rate at invocation time.
    ///
    /// On UTXO ledgers the redeem transaction spends the HTLC output to a
    /// destination of the caller's choosing and must carry its own fee; on
    /// account-based ledgers the contract pays out to the redeem identity
    /// fixed at derivation time.
    pub fn requires_fee_rate_choice(&self) -> bool {
        match self {
            Ledger::Bitcoin { .. } => true,
            Ledger::Ethereum { .. } => false,
        }
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ledger::Bitcoin { network } => write!(f, "bitcoin-{}", network),
            Ledger::Ethereum { chain_id } => write!(f, "ethereum-{}", chain_id),
        }
    }
}

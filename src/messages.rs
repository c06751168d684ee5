use crate::{
    asset::Asset, identity::Identity, ledger::Ledger, HashFunction, RelativeTime, SecretHash,
    SwapId,
};
use serde::{Deserialize, Serialize};

/// High-level message that represents a swap request from the initiating
/// party.
///
/// Immutable once accepted; the state machine never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    pub swap_id: SwapId,
    pub alpha_ledger: Ledger,
    pub beta_ledger: Ledger,
    pub alpha_asset: Asset,
    pub beta_asset: Asset,
    pub hash_function: HashFunction,
    pub alpha_refund_identity: Identity,
    pub beta_redeem_identity: Identity,
    pub alpha_lock_duration: RelativeTime,
    pub secret_hash: SecretHash,
}

/// High-level message that represents accepting a swap request.
///
/// Created exactly once, at acceptance; carries the responder's
/// complementary identities and the beta leg's lock duration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accept {
    pub swap_id: SwapId,
    pub alpha_redeem_identity: Identity,
    pub beta_refund_identity: Identity,
    pub beta_lock_duration: RelativeTime,
}

/// High-level message that represents declining a swap request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decline {
    pub swap_id: SwapId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SwapDeclineReason>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapDeclineReason {
    UnsatisfactoryRate,
    UnsupportedProtocol,
    UnsupportedSwap,
}

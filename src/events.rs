use crate::{
    asset::Quantity, htlc_location::Locator, transaction::TransactionId, Secret, Side,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The HTLC contract existing on-chain but not yet holding the asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployed {
    pub transaction: TransactionId,
    pub location: Locator,
}

/// The asset arriving at the HTLC.
///
/// Carries the observed quantity so the state machine can distinguish a
/// correct funding from an incorrect one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funded {
    pub transaction: TransactionId,
    pub quantity: Quantity,
}

/// The asset leaving the HTLC towards the redeem identity.
///
/// The secret is extracted from the redeem transaction by the ledger
/// observer; the state machine verifies it against the commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redeemed {
    pub transaction: TransactionId,
    pub secret: Secret,
}

/// The asset leaving the HTLC back towards the refund identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refunded {
    pub transaction: TransactionId,
}

/// An observation made on one of the two ledgers, as reported by the
/// observers feeding the core.
///
/// Timelock expiry is an observation like any other: the clocks consulted to
/// decide that an expiry has passed live with the observers, not in here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapEvent {
    AlphaDeployed(Deployed),
    AlphaFunded(Funded),
    AlphaRedeemed(Redeemed),
    AlphaRefunded(Refunded),
    AlphaTimelockElapsed,
    BetaDeployed(Deployed),
    BetaFunded(Funded),
    BetaRedeemed(Redeemed),
    BetaRefunded(Refunded),
    BetaTimelockElapsed,
}

impl SwapEvent {
    pub fn side(&self) -> Side {
        match self {
            SwapEvent::AlphaDeployed(_)
            | SwapEvent::AlphaFunded(_)
            | SwapEvent::AlphaRedeemed(_)
            | SwapEvent::AlphaRefunded(_)
            | SwapEvent::AlphaTimelockElapsed => Side::Alpha,
            SwapEvent::BetaDeployed(_)
            | SwapEvent::BetaFunded(_)
            | SwapEvent::BetaRedeemed(_)
            | SwapEvent::BetaRefunded(_)
            | SwapEvent::BetaTimelockElapsed => Side::Beta,
        }
    }
}

impl fmt::Display for SwapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapEvent::AlphaDeployed(_) => "AlphaDeployed",
            SwapEvent::AlphaFunded(_) => "AlphaFunded",
            SwapEvent::AlphaRedeemed(_) => "AlphaRedeemed",
            SwapEvent::AlphaRefunded(_) => "AlphaRefunded",
            SwapEvent::AlphaTimelockElapsed => "AlphaTimelockElapsed",
            SwapEvent::BetaDeployed(_) => "BetaDeployed",
            SwapEvent::BetaFunded(_) => "BetaFunded",
            SwapEvent::BetaRedeemed(_) => "BetaRedeemed",
            SwapEvent::BetaRefunded(_) => "BetaRefunded",
            SwapEvent::BetaTimelockElapsed => "BetaTimelockElapsed",
        };
        f.write_str(name)
    }
}

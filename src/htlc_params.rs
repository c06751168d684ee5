use crate::{
    asset::{Asset, AssetKind, Quantity},
    htlc_location::Locator,
    identity::Identity,
    ledger::Ledger,
    messages::{Accept, Request},
    RelativeTime, SecretHash, Side, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Declared protocol parameters that are not negotiated per swap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The alpha leg must stay locked for at least this much longer than the
    /// beta leg, so that the responder can still redeem on alpha after the
    /// initiator's beta-leg redeem revealed the secret.
    pub refund_safety_margin: RelativeTime,
    /// Funding transactions for native assets may have a deterministic fee
    /// deducted from the locked value; a leg still counts as correctly
    /// funded if the observed quantity is short by at most this much.
    pub native_fee_tolerance: Quantity,
    /// Number of confirmations the ledger observers must wait for before an
    /// event is delivered to the core. The core itself never counts
    /// confirmations; this is handed to the observers as-is.
    pub required_confirmations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            refund_safety_margin: RelativeTime::new(6 * 60 * 60),
            native_fee_tolerance: Quantity::ZERO,
            required_confirmations: 1,
        }
    }
}

/// The concrete parameters of the HTLC on one leg.
///
/// The alpha and beta instances are independent except for the shared secret
/// hash, which is what makes the swap atomic. Immutable once the contract
/// has been observed on-chain; only `htlc_location` is back-filled, exactly
/// once, from the deployment event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HtlcParams {
    pub ledger: Ledger,
    pub asset: Asset,
    pub redeem_identity: Identity,
    pub refund_identity: Identity,
    pub expiry: Timestamp,
    pub secret_hash: SecretHash,
    pub fee_tolerance: Quantity,
    pub htlc_location: Option<Locator>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidParameters {
    #[error("{0} asset quantity must be positive")]
    NonPositiveQuantity(Side),
    #[error("{0} lock duration must be positive")]
    NonPositiveLockDuration(Side),
    #[error("{0} identity is missing")]
    MissingIdentity(&'static str),
    #[error("{0} ledger cannot hold the requested asset")]
    UnsupportedAsset(Side),
    #[error("alpha lock duration must exceed the beta lock duration by the refund safety margin")]
    InsufficientSafetyMargin,
    #[error("swap ids of request and response do not match")]
    SwapIdMismatch,
    #[error("secret does not hash to the request's secret hash")]
    SecretMismatch,
}

/// Derives the HTLC parameters for both legs from a request and the
/// counterparty's response.
///
/// Fails closed: any inconsistency yields `InvalidParameters` and no partial
/// derivation. Lock durations are anchored to `accepted_at` to produce the
/// absolute expiries the contracts are parameterized with.
pub fn derive(
    request: &Request,
    response: &Accept,
    config: &Config,
    accepted_at: Timestamp,
) -> Result<(HtlcParams, HtlcParams), InvalidParameters> {
    if request.swap_id != response.swap_id {
        return Err(InvalidParameters::SwapIdMismatch);
    }

    if request.alpha_asset.quantity().is_zero() {
        return Err(InvalidParameters::NonPositiveQuantity(Side::Alpha));
    }
    if request.beta_asset.quantity().is_zero() {
        return Err(InvalidParameters::NonPositiveQuantity(Side::Beta));
    }

    if request.alpha_lock_duration.is_zero() {
        return Err(InvalidParameters::NonPositiveLockDuration(Side::Alpha));
    }
    if response.beta_lock_duration.is_zero() {
        return Err(InvalidParameters::NonPositiveLockDuration(Side::Beta));
    }

    if request.alpha_refund_identity.is_empty() {
        return Err(InvalidParameters::MissingIdentity("alpha refund"));
    }
    if request.beta_redeem_identity.is_empty() {
        return Err(InvalidParameters::MissingIdentity("beta redeem"));
    }
    if response.alpha_redeem_identity.is_empty() {
        return Err(InvalidParameters::MissingIdentity("alpha redeem"));
    }
    if response.beta_refund_identity.is_empty() {
        return Err(InvalidParameters::MissingIdentity("beta refund"));
    }

    if !request.alpha_ledger.supports(&request.alpha_asset) {
        return Err(InvalidParameters::UnsupportedAsset(Side::Alpha));
    }
    if !request.beta_ledger.supports(&request.beta_asset) {
        return Err(InvalidParameters::UnsupportedAsset(Side::Beta));
    }

    // The beta expiry must elapse first: the initiator redeems on beta
    // (revealing the secret) and the responder must have the margin left to
    // redeem on alpha before the initiator becomes eligible for a refund.
    let minimum_alpha_lock = response
        .beta_lock_duration
        .plus(config.refund_safety_margin);
    if u32::from(request.alpha_lock_duration) <= u32::from(minimum_alpha_lock) {
        return Err(InvalidParameters::InsufficientSafetyMargin);
    }

    let alpha = HtlcParams {
        ledger: request.alpha_ledger,
        asset: request.alpha_asset.clone(),
        redeem_identity: response.alpha_redeem_identity.clone(),
        refund_identity: request.alpha_refund_identity.clone(),
        expiry: accepted_at.plus(request.alpha_lock_duration),
        secret_hash: request.secret_hash,
        fee_tolerance: fee_tolerance(&request.alpha_asset, config),
        htlc_location: None,
    };

    let beta = HtlcParams {
        ledger: request.beta_ledger,
        asset: request.beta_asset.clone(),
        redeem_identity: request.beta_redeem_identity.clone(),
        refund_identity: response.beta_refund_identity.clone(),
        expiry: accepted_at.plus(response.beta_lock_duration),
        secret_hash: request.secret_hash,
        fee_tolerance: fee_tolerance(&request.beta_asset, config),
        htlc_location: None,
    };

    Ok((alpha, beta))
}

/// Token funding moves the exact amount through the contract; only native
/// coin funding may be short by a deterministic fee.
fn fee_tolerance(asset: &Asset, config: &Config) -> Quantity {
    match asset.kind() {
        AssetKind::Native => config.native_fee_tolerance,
        AssetKind::Token => Quantity::ZERO,
    }
}

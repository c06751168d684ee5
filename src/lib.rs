#![warn(
    unused_extern_crates,
    missing_debug_implementations,
    rust_2018_idioms,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::fallible_impl_from,
    clippy::print_stdout,
    clippy::dbg_macro
)]
#![forbid(unsafe_code)]

pub mod actions;
pub mod asset;
pub mod events;
pub mod htlc_location;
pub mod htlc_params;
pub mod identity;
pub mod ledger;
pub mod ledger_state;
pub mod messages;
pub mod registry;
pub mod resource;
mod secret;
pub mod state_machine;
mod swap_id;
mod timestamp;
pub mod transaction;

pub use self::{
    secret::{Secret, SecretHash, SECRET_LENGTH},
    swap_id::SwapId,
    timestamp::{RelativeTime, Timestamp},
};

use serde::{Deserialize, Serialize};

/// The role of the local party in a swap.
///
/// By convention, Alice initiates the swap and generates the secret value.
/// Alice funds the HTLC on the alpha ledger and redeems on the beta ledger,
/// thereby revealing the secret on-chain. Bob responds to the swap request,
/// funds the beta ledger HTLC and redeems on the alpha ledger using the
/// secret he learned from Alice's redeem transaction.
#[derive(
    Clone,
    Copy,
    Debug,
    strum_macros::Display,
    strum_macros::EnumString,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum Role {
    Alice,
    Bob,
}

/// A swap is a composition of two HTLCs, one on each _side_.
///
/// We call those two sides `Alpha` and `Beta` as those are neutral
/// descriptions of the two ledgers involved. Both parties of a swap refer to
/// the same ledger as the `Alpha` ledger, which allows us to reason about the
/// protocol from a global perspective. Only the _combination_ of a party's
/// role and the side of a ledger unambiguously determines who is responsible
/// for which action.
#[derive(
    Clone,
    Copy,
    Debug,
    strum_macros::Display,
    strum_macros::EnumString,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum Side {
    Alpha,
    Beta,
}

/// The hash function used for the secret commitment shared by both legs.
///
/// Closed enumeration so that introducing another hash function is a
/// compile-time checked extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum HashFunction {
    #[serde(rename = "SHA-256")]
    #[strum(serialize = "SHA-256")]
    Sha256,
}

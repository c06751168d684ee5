use crate::identity::Identity;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use strum_macros::{Display, EnumDiscriminants, EnumString};

/// The amount of an asset locked in an HTLC, in the asset's smallest
/// indivisible unit (satoshi, wei, token base unit, ...).
///
/// 128 bits are enough for every ledger we care about; token quantities with
/// 18 decimals comfortably fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u128);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn new(units: u128) -> Self {
        Quantity(units)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0.saturating_sub(rhs.0))
    }
}

impl From<u128> for Quantity {
    fn from(units: u128) -> Self {
        Quantity(units)
    }
}

impl From<Quantity> for u128 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantities serialize as decimal strings so that consumers without native
/// 128-bit integers (JSON, JavaScript) do not silently lose precision.
impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let units = u128::from_str(value.as_str()).map_err(de::Error::custom)?;

        Ok(Quantity(units))
    }
}

/// The asset locked on one leg of a swap.
///
/// A closed enumeration: either the ledger's native coin or a token managed
/// by a contract on that ledger. Matching on it is exhaustive, so supporting
/// a new asset kind is a compile-time checked extension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(
    name(AssetKind),
    derive(Display, EnumString),
    strum(serialize_all = "lowercase")
)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Asset {
    Native {
        quantity: Quantity,
    },
    Token {
        quantity: Quantity,
        contract: Identity,
    },
}

impl Asset {
    pub fn native(quantity: Quantity) -> Self {
        Asset::Native { quantity }
    }

    pub fn token(quantity: Quantity, contract: Identity) -> Self {
        Asset::Token { quantity, contract }
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            Asset::Native { quantity } => *quantity,
            Asset::Token { quantity, .. } => *quantity,
        }
    }

    pub fn kind(&self) -> AssetKind {
        AssetKind::from(self)
    }
}

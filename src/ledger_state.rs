use crate::{
    asset::Quantity,
    events::{Deployed, Funded, Redeemed, Refunded},
    htlc_location::Locator,
    transaction::TransactionId,
    Secret,
};
use serde::Serialize;
use strum_macros::{Display, EnumDiscriminants};

/// The lifecycle of the HTLC on one ledger.
///
/// Both legs of a swap progress through this lifecycle independently; the
/// compound swap state is computed from the pair. Transitions are driven by
/// observed ledger events and only ever move forward.
#[derive(Clone, Debug, PartialEq, Serialize, EnumDiscriminants)]
#[strum_discriminants(
    name(HtlcState),
    derive(Serialize, Display),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerState {
    NotDeployed,
    Deployed {
        htlc_location: Locator,
        deploy_transaction: TransactionId,
    },
    Funded {
        htlc_location: Locator,
        deploy_transaction: TransactionId,
        fund_transaction: TransactionId,
        quantity: Quantity,
    },
    IncorrectlyFunded {
        htlc_location: Locator,
        deploy_transaction: TransactionId,
        fund_transaction: TransactionId,
        quantity: Quantity,
    },
    Redeemed {
        htlc_location: Locator,
        deploy_transaction: TransactionId,
        fund_transaction: TransactionId,
        redeem_transaction: TransactionId,
        secret: Secret,
    },
    Refunded {
        htlc_location: Locator,
        deploy_transaction: TransactionId,
        fund_transaction: TransactionId,
        refund_transaction: TransactionId,
    },
}

/// The outcome of feeding an event into a [`LedgerState`].
///
/// An exact replay of an already-applied event is reported as a duplicate so
/// the caller can treat it as a no-op instead of an error. Replays are
/// matched on the transaction id recorded when the event was first applied,
/// even if the leg has advanced further since.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Duplicate,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event} event to HTLC in state {state}")]
pub struct IllegalTransition {
    pub event: &'static str,
    pub state: HtlcState,
}

impl Default for LedgerState {
    fn default() -> Self {
        LedgerState::NotDeployed
    }
}

impl LedgerState {
    pub fn state(&self) -> HtlcState {
        HtlcState::from(self)
    }

    pub fn transition_to_deployed(
        &mut self,
        deployed: Deployed,
    ) -> Result<Transition, IllegalTransition> {
        if let Some(applied) = self.deploy_transaction() {
            return if *applied == deployed.transaction {
                Ok(Transition::Duplicate)
            } else {
                Err(self.illegal("deploy"))
            };
        }

        // deploy_transaction is None, so the state is NotDeployed.
        *self = LedgerState::Deployed {
            htlc_location: deployed.location,
            deploy_transaction: deployed.transaction,
        };

        Ok(Transition::Applied)
    }

    pub fn transition_to_funded(
        &mut self,
        funded: Funded,
    ) -> Result<Transition, IllegalTransition> {
        if let Some(applied) = self.fund_transaction() {
            return if *applied == funded.transaction {
                Ok(Transition::Duplicate)
            } else {
                Err(self.illegal("fund"))
            };
        }

        match std::mem::take(self) {
            LedgerState::Deployed {
                htlc_location,
                deploy_transaction,
            } => {
                *self = LedgerState::Funded {
                    htlc_location,
                    deploy_transaction,
                    fund_transaction: funded.transaction,
                    quantity: funded.quantity,
                };
                Ok(Transition::Applied)
            }
            other => {
                *self = other;
                Err(self.illegal("fund"))
            }
        }
    }

    pub fn transition_to_incorrectly_funded(
        &mut self,
        funded: Funded,
    ) -> Result<Transition, IllegalTransition> {
        if let Some(applied) = self.fund_transaction() {
            return if *applied == funded.transaction {
                Ok(Transition::Duplicate)
            } else {
                Err(self.illegal("fund"))
            };
        }

        match std::mem::take(self) {
            LedgerState::Deployed {
                htlc_location,
                deploy_transaction,
            } => {
                *self = LedgerState::IncorrectlyFunded {
                    htlc_location,
                    deploy_transaction,
                    fund_transaction: funded.transaction,
                    quantity: funded.quantity,
                };
                Ok(Transition::Applied)
            }
            other => {
                *self = other;
                Err(self.illegal("fund"))
            }
        }
    }

    pub fn transition_to_redeemed(
        &mut self,
        redeemed: Redeemed,
    ) -> Result<Transition, IllegalTransition> {
        if let LedgerState::Redeemed {
            redeem_transaction, ..
        } = self
        {
            return if *redeem_transaction == redeemed.transaction {
                Ok(Transition::Duplicate)
            } else {
                Err(self.illegal("redeem"))
            };
        }

        match std::mem::take(self) {
            LedgerState::Funded {
                htlc_location,
                deploy_transaction,
                fund_transaction,
                ..
            } => {
                *self = LedgerState::Redeemed {
                    htlc_location,
                    deploy_transaction,
                    fund_transaction,
                    redeem_transaction: redeemed.transaction,
                    secret: redeemed.secret,
                };
                Ok(Transition::Applied)
            }
            other => {
                *self = other;
                Err(self.illegal("redeem"))
            }
        }
    }

    /// Refund is allowed from both the correctly and the incorrectly funded
    /// state; an incorrectly funded HTLC can only ever be refunded.
    pub fn transition_to_refunded(
        &mut self,
        refunded: Refunded,
    ) -> Result<Transition, IllegalTransition> {
        if let LedgerState::Refunded {
            refund_transaction, ..
        } = self
        {
            return if *refund_transaction == refunded.transaction {
                Ok(Transition::Duplicate)
            } else {
                Err(self.illegal("refund"))
            };
        }

        match std::mem::take(self) {
            LedgerState::Funded {
                htlc_location,
                deploy_transaction,
                fund_transaction,
                ..
            }
            | LedgerState::IncorrectlyFunded {
                htlc_location,
                deploy_transaction,
                fund_transaction,
                ..
            } => {
                *self = LedgerState::Refunded {
                    htlc_location,
                    deploy_transaction,
                    fund_transaction,
                    refund_transaction: refunded.transaction,
                };
                Ok(Transition::Applied)
            }
            other => {
                *self = other;
                Err(self.illegal("refund"))
            }
        }
    }

    pub fn htlc_location(&self) -> Option<&Locator> {
        match self {
            LedgerState::NotDeployed => None,
            LedgerState::Deployed { htlc_location, .. }
            | LedgerState::Funded { htlc_location, .. }
            | LedgerState::IncorrectlyFunded { htlc_location, .. }
            | LedgerState::Redeemed { htlc_location, .. }
            | LedgerState::Refunded { htlc_location, .. } => Some(htlc_location),
        }
    }

    fn deploy_transaction(&self) -> Option<&TransactionId> {
        match self {
            LedgerState::NotDeployed => None,
            LedgerState::Deployed {
                deploy_transaction, ..
            }
            | LedgerState::Funded {
                deploy_transaction, ..
            }
            | LedgerState::IncorrectlyFunded {
                deploy_transaction, ..
            }
            | LedgerState::Redeemed {
                deploy_transaction, ..
            }
            | LedgerState::Refunded {
                deploy_transaction, ..
            } => Some(deploy_transaction),
        }
    }

    fn fund_transaction(&self) -> Option<&TransactionId> {
        match self {
            LedgerState::NotDeployed | LedgerState::Deployed { .. } => None,
            LedgerState::Funded {
                fund_transaction, ..
            }
            | LedgerState::IncorrectlyFunded {
                fund_transaction, ..
            }
            | LedgerState::Redeemed {
                fund_transaction, ..
            }
            | LedgerState::Refunded {
                fund_transaction, ..
            } => Some(fund_transaction),
        }
    }

    fn illegal(&self, event: &'static str) -> IllegalTransition {
        IllegalTransition {
            event,
            state: self.state(),
        }
    }
}

use crate::{
    asset::{Asset, Quantity},
    htlc_location::Locator,
    htlc_params::HtlcParams,
    identity::Identity,
    ledger_state::HtlcState,
    state_machine::{SwapCommunication, SwapState},
    Role, Secret, Side, SwapId,
};
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Resolves the set of actions a state makes available to the local party.
pub trait Actions {
    type ActionKind;

    fn actions(&self) -> Vec<Self::ActionKind>;
}

/// An action the local party can take next, together with everything needed
/// to execute it.
///
/// The core never executes actions; it only names them. Executing one means
/// sending a message or a transaction, which is the caller's business.
#[derive(Clone, Debug, PartialEq, Serialize, strum_macros::EnumDiscriminants)]
#[strum_discriminants(
    name(ActionKind),
    derive(Display, EnumString, Serialize),
    strum(serialize_all = "snake_case"),
    serde(rename_all = "snake_case")
)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Action {
    Accept(Accept),
    Decline(Decline),
    Deploy(Deploy),
    Fund(Fund),
    Redeem(Redeem),
    Refund(Refund),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Accept {
    pub swap_id: SwapId,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decline {
    pub swap_id: SwapId,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Deploy {
    pub side: Side,
    pub params: HtlcParams,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fund {
    pub side: Side,
    pub htlc_location: Locator,
    pub asset: Asset,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Redeem {
    pub side: Side,
    pub htlc_location: Locator,
    pub secret: Secret,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Refund {
    pub side: Side,
    pub htlc_location: Locator,
}

/// Inputs only the caller can know when executing a redeem.
///
/// The destination is wherever the redeeming party wants the asset to end
/// up; the fee rate is required on ledgers where the redeem transaction
/// carries its own fee (see [`Ledger::requires_fee_rate_choice`]).
///
/// [`Ledger::requires_fee_rate_choice`]: crate::ledger::Ledger::requires_fee_rate_choice
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RedeemParameters {
    pub destination: Identity,
    pub fee_rate: Option<Quantity>,
}

impl Actions for SwapState {
    type ActionKind = Action;

    /// The available actions follow from the role, the communication phase
    /// and both HTLC states.
    ///
    /// Refund is appended last so callers that execute actions in order
    /// prefer making progress over abandoning the swap.
    fn actions(&self) -> Vec<Action> {
        let swap_id = self.request().swap_id;

        match &self.communication {
            SwapCommunication::Proposed { .. } => {
                return match self.role {
                    // Alice waits for Bob's answer.
                    Role::Alice => vec![],
                    Role::Bob => vec![
                        Action::Accept(Accept { swap_id }),
                        Action::Decline(Decline { swap_id }),
                    ],
                };
            }
            SwapCommunication::Declined { .. } => return vec![],
            SwapCommunication::Accepted { .. } => {}
        }

        match self.role {
            Role::Alice => self.alice_actions(),
            Role::Bob => self.bob_actions(),
        }
    }
}

impl SwapState {
    fn alice_actions(&self) -> Vec<Action> {
        let mut actions = vec![];

        let alpha = self.ledger_state(Side::Alpha);
        let beta = self.ledger_state(Side::Beta);

        match alpha.state() {
            HtlcState::NotDeployed => {
                if let Some(params) = self.htlc_params(Side::Alpha) {
                    actions.push(Action::Deploy(Deploy {
                        side: Side::Alpha,
                        params: params.clone(),
                    }));
                }
            }
            HtlcState::Deployed => {
                if let Some(htlc_location) = alpha.htlc_location() {
                    actions.push(Action::Fund(Fund {
                        side: Side::Alpha,
                        htlc_location: htlc_location.clone(),
                        asset: self.request().alpha_asset.clone(),
                    }));
                }
            }
            _ => {}
        }

        if alpha.state() == HtlcState::Funded && beta.state() == HtlcState::Funded {
            if let (Some(htlc_location), Some(secret)) = (beta.htlc_location(), self.secret) {
                actions.push(Action::Redeem(Redeem {
                    side: Side::Beta,
                    htlc_location: htlc_location.clone(),
                    secret,
                }));
            }
        }

        self.push_refund_if_available(Side::Alpha, &mut actions);

        actions
    }

    fn bob_actions(&self) -> Vec<Action> {
        let mut actions = vec![];

        let alpha = self.ledger_state(Side::Alpha);
        let beta = self.ledger_state(Side::Beta);

        // Bob only moves once Alice has locked up the alpha asset.
        if alpha.state() == HtlcState::Funded {
            match beta.state() {
                HtlcState::NotDeployed => {
                    if let Some(params) = self.htlc_params(Side::Beta) {
                        actions.push(Action::Deploy(Deploy {
                            side: Side::Beta,
                            params: params.clone(),
                        }));
                    }
                }
                HtlcState::Deployed => {
                    if let Some(htlc_location) = beta.htlc_location() {
                        actions.push(Action::Fund(Fund {
                            side: Side::Beta,
                            htlc_location: htlc_location.clone(),
                            asset: self.request().beta_asset.clone(),
                        }));
                    }
                }
                _ => {}
            }

            if let (Some(htlc_location), Some(secret)) = (alpha.htlc_location(), self.secret) {
                actions.push(Action::Redeem(Redeem {
                    side: Side::Alpha,
                    htlc_location: htlc_location.clone(),
                    secret,
                }));
            }
        }

        self.push_refund_if_available(Side::Beta, &mut actions);

        actions
    }

    /// A party can refund its own leg once the asset is locked there and the
    /// leg's timelock has elapsed. Incorrect funding can only be refunded.
    fn push_refund_if_available(&self, side: Side, actions: &mut Vec<Action>) {
        let ledger_state = self.ledger_state(side);
        let funded = matches!(
            ledger_state.state(),
            HtlcState::Funded | HtlcState::IncorrectlyFunded
        );

        if funded && self.timelock_elapsed(side) {
            if let Some(htlc_location) = ledger_state.htlc_location() {
                actions.push(Action::Refund(Refund {
                    side,
                    htlc_location: htlc_location.clone(),
                }));
            }
        }
    }
}

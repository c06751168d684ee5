use crate::{
    actions::{Action, ActionKind, Actions},
    htlc_location::Locator,
    ledger_state::HtlcState,
    state_machine::{SwapState, SwapStateName},
    Role, Side, SwapId,
};
use serde::Serialize;

/// A read-only projection of a swap for outward-facing layers.
///
/// Everything in here is serializable and safe to hand out; in particular
/// the secret never appears, only the actions that would use it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwapResource {
    pub id: SwapId,
    pub role: Role,
    pub state: SwapStateName,
    pub alpha_ledger: LegResource,
    pub beta_ledger: LegResource,
    pub actions: Vec<ActionResource>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegResource {
    pub state: HtlcState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub htlc_location: Option<Locator>,
}

/// Names an available action and the fields the caller has to supply when
/// invoking it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionResource {
    pub name: ActionKind,
    pub fields: Vec<&'static str>,
}

impl SwapResource {
    pub fn new(id: SwapId, state: &SwapState) -> Self {
        let actions = state
            .actions()
            .iter()
            .map(|action| ActionResource {
                name: ActionKind::from(action),
                fields: caller_supplied_fields(state, action),
            })
            .collect();

        Self {
            id,
            role: state.role,
            state: state.state(),
            alpha_ledger: leg(state, Side::Alpha),
            beta_ledger: leg(state, Side::Beta),
            actions,
        }
    }
}

fn leg(state: &SwapState, side: Side) -> LegResource {
    let ledger_state = state.ledger_state(side);

    LegResource {
        state: ledger_state.state(),
        htlc_location: ledger_state.htlc_location().cloned(),
    }
}

/// The core cannot know where a redeemed asset should go, nor the fee rate
/// on ledgers where the redeem transaction pays its own fee.
fn caller_supplied_fields(state: &SwapState, action: &Action) -> Vec<&'static str> {
    match action {
        Action::Redeem(redeem) => {
            let ledger = match redeem.side {
                Side::Alpha => state.request().alpha_ledger,
                Side::Beta => state.request().beta_ledger,
            };
            if ledger.requires_fee_rate_choice() {
                vec!["destination", "fee_rate"]
            } else {
                vec!["destination"]
            }
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        asset::{Asset, Quantity},
        events::{Deployed, Funded, SwapEvent},
        htlc_params::Config,
        ledger::{Ledger, Network},
        messages::{Accept, Request},
        transaction::TransactionId,
        HashFunction, RelativeTime, Secret, Timestamp,
    };
    use spectral::prelude::*;

    fn secret() -> Secret {
        Secret::from(*b"hello world, you are beautiful!!")
    }

    fn request() -> Request {
        Request {
            swap_id: SwapId::default(),
            alpha_ledger: Ledger::Ethereum { chain_id: 17 },
            beta_ledger: Ledger::Bitcoin {
                network: Network::Dev,
            },
            alpha_asset: Asset::token(
                Quantity::new(5_000_000_000_000_000_000_000),
                "b97048628db6b661d4c2aa833e95dbe1a905b280".parse().unwrap(),
            ),
            beta_asset: Asset::native(Quantity::new(100_000_000)),
            hash_function: HashFunction::Sha256,
            alpha_refund_identity: "00f0e2a7ee47ceb4d95576ed77b77bcd84fe8f12".parse().unwrap(),
            beta_redeem_identity: "02c2a8efce029526d364c2cf39d89e3cdda05e5df7b2cbfc098b4e3d02b70b5275"
                .parse()
                .unwrap(),
            alpha_lock_duration: RelativeTime::new(60 * 60 * 24),
            secret_hash: secret().hash(),
        }
    }

    fn response(swap_id: SwapId) -> Accept {
        Accept {
            swap_id,
            alpha_redeem_identity: "1d52b6ed92bcc4437b10e999525ebbcc0e8877a2".parse().unwrap(),
            beta_refund_identity: "0371c23660b13f672dbd3c19ba34b275302b2f23f24de232e116c0e39a9d42b653"
                .parse()
                .unwrap(),
            beta_lock_duration: RelativeTime::new(60 * 60 * 12),
        }
    }

    #[test]
    fn resource_never_contains_the_secret() {
        let request = request();
        let resp = response(request.swap_id);
        let id = request.swap_id;
        let mut state = SwapState::new_alice(request, secret()).unwrap();
        state
            .accept(resp, &Config::default(), Timestamp::from(0))
            .unwrap();

        let resource = SwapResource::new(id, &state);
        let json = serde_json::to_string(&resource).unwrap();

        assert!(!json.contains(&format!("{:x}", secret())));
    }

    #[test]
    fn redeem_on_a_utxo_ledger_declares_a_fee_rate_field() {
        let request = request();
        let resp = response(request.swap_id);
        let id = request.swap_id;
        let mut state = SwapState::new_alice(request, secret()).unwrap();
        state
            .accept(resp, &Config::default(), Timestamp::from(0))
            .unwrap();

        state
            .apply(SwapEvent::AlphaDeployed(Deployed {
                transaction: TransactionId::new(vec![0x01]),
                location: Locator::new(vec![0xaa]),
            }))
            .unwrap();
        state
            .apply(SwapEvent::AlphaFunded(Funded {
                transaction: TransactionId::new(vec![0x02]),
                quantity: Quantity::new(5_000_000_000_000_000_000_000),
            }))
            .unwrap();
        state
            .apply(SwapEvent::BetaDeployed(Deployed {
                transaction: TransactionId::new(vec![0x03]),
                location: Locator::new(vec![0xbb]),
            }))
            .unwrap();
        state
            .apply(SwapEvent::BetaFunded(Funded {
                transaction: TransactionId::new(vec![0x04]),
                quantity: Quantity::new(100_000_000),
            }))
            .unwrap();

        let resource = SwapResource::new(id, &state);

        // Alice redeems on the beta (Bitcoin) leg.
        let redeem = resource
            .actions
            .iter()
            .find(|action| action.name == ActionKind::Redeem)
            .expect("redeem must be available");
        assert_eq!(redeem.fields, vec!["destination", "fee_rate"]);
    }

    #[test]
    fn legs_expose_their_sub_state_and_locator() {
        let request = request();
        let resp = response(request.swap_id);
        let id = request.swap_id;
        let mut state = SwapState::new_bob(request);
        state
            .accept(resp, &Config::default(), Timestamp::from(0))
            .unwrap();
        state
            .apply(SwapEvent::AlphaDeployed(Deployed {
                transaction: TransactionId::new(vec![0x01]),
                location: Locator::new(vec![0xaa]),
            }))
            .unwrap();

        let resource = SwapResource::new(id, &state);

        assert_eq!(resource.alpha_ledger.state, HtlcState::Deployed);
        assert_eq!(
            resource.alpha_ledger.htlc_location,
            Some(Locator::new(vec![0xaa]))
        );
        assert_eq!(resource.beta_ledger.state, HtlcState::NotDeployed);
        assert_that(&resource.beta_ledger.htlc_location).is_none();
    }
}

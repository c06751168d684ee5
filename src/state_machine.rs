use crate::{
    events::{Deployed, Funded, SwapEvent},
    htlc_params::{self, Config, HtlcParams, InvalidParameters},
    ledger_state::{HtlcState, IllegalTransition, LedgerState, Transition},
    messages::{Accept, Decline, Request},
    Role, Secret, Side, Timestamp,
};
use serde::Serialize;

/// The communication phase of a swap, from the local party's point of view.
#[derive(Clone, Debug, PartialEq)]
pub enum SwapCommunication {
    Proposed {
        request: Request,
    },
    Accepted {
        request: Request,
        response: Accept,
    },
    Declined {
        request: Request,
        response: Decline,
    },
}

impl SwapCommunication {
    pub fn request(&self) -> &Request {
        match self {
            SwapCommunication::Proposed { request }
            | SwapCommunication::Accepted { request, .. }
            | SwapCommunication::Declined { request, .. } => request,
        }
    }
}

/// The compound state of a swap, computed from the communication phase and
/// the two per-leg HTLC states.
///
/// Never stored; always derived, so it cannot drift from the per-leg states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStateName {
    Start,
    Rejected,
    Accepted,
    AlphaDeployed,
    AlphaFunded,
    BothFunded,
    AlphaFundedBetaRedeemed,
    AlphaRedeemedBetaFunded,
    BothRedeemed,
    Refunded,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("swap has already been accepted or declined")]
    AlreadyAccepted,
    #[error("ledger events cannot be applied before the swap is accepted")]
    NotYetAccepted,
    #[error("swap was declined, no ledger events are expected")]
    SwapDeclined,
    #[error("invalid swap parameters")]
    InvalidParameters(#[from] InvalidParameters),
    #[error("illegal transition on {side} leg")]
    Illegal {
        side: Side,
        source: IllegalTransition,
    },
    #[error("observed redeem secret does not match the secret hash commitment")]
    IncorrectSecret,
    #[error("refund observed on {0} leg before its timelock elapsed")]
    RefundBeforeExpiry(Side),
}

/// The full state of one swap.
///
/// Owns the communication messages, both per-leg HTLC states and the derived
/// HTLC parameters. Events are applied one at a time; the two legs progress
/// independently, so cross-leg interleavings commute.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapState {
    pub role: Role,
    pub communication: SwapCommunication,
    pub alpha_ledger_state: LedgerState,
    pub beta_ledger_state: LedgerState,
    pub alpha_htlc_params: Option<HtlcParams>,
    pub beta_htlc_params: Option<HtlcParams>,
    pub alpha_timelock_elapsed: bool,
    pub beta_timelock_elapsed: bool,
    /// Alice knows the secret from the start; Bob captures it from the first
    /// verified redeem observation.
    pub secret: Option<Secret>,
}

impl SwapState {
    /// Creates the state for the initiating party.
    ///
    /// The secret must hash to the commitment carried in the request,
    /// otherwise the initiator could never redeem the beta leg.
    pub fn new_alice(request: Request, secret: Secret) -> Result<Self, Error> {
        if secret.hash() != request.secret_hash {
            return Err(Error::InvalidParameters(InvalidParameters::SecretMismatch));
        }

        Ok(Self {
            role: Role::Alice,
            communication: SwapCommunication::Proposed { request },
            alpha_ledger_state: LedgerState::NotDeployed,
            beta_ledger_state: LedgerState::NotDeployed,
            alpha_htlc_params: None,
            beta_htlc_params: None,
            alpha_timelock_elapsed: false,
            beta_timelock_elapsed: false,
            secret: Some(secret),
        })
    }

    /// Creates the state for the responding party, who does not know the
    /// secret yet.
    pub fn new_bob(request: Request) -> Self {
        Self {
            role: Role::Bob,
            communication: SwapCommunication::Proposed { request },
            alpha_ledger_state: LedgerState::NotDeployed,
            beta_ledger_state: LedgerState::NotDeployed,
            alpha_htlc_params: None,
            beta_htlc_params: None,
            alpha_timelock_elapsed: false,
            beta_timelock_elapsed: false,
            secret: None,
        }
    }

    /// Accepts the swap, deriving the HTLC parameters for both legs.
    ///
    /// Exactly-once: a second accept or an accept after a decline fails and
    /// leaves the state untouched. Parameter derivation failures also leave
    /// the swap in the proposed phase.
    pub fn accept(
        &mut self,
        response: Accept,
        config: &Config,
        accepted_at: Timestamp,
    ) -> Result<(), Error> {
        let request = match &self.communication {
            SwapCommunication::Proposed { request } => request.clone(),
            SwapCommunication::Accepted { .. } | SwapCommunication::Declined { .. } => {
                return Err(Error::AlreadyAccepted)
            }
        };

        let (alpha, beta) = htlc_params::derive(&request, &response, config, accepted_at)?;

        self.alpha_htlc_params = Some(alpha);
        self.beta_htlc_params = Some(beta);
        self.communication = SwapCommunication::Accepted { request, response };

        Ok(())
    }

    /// Declines the swap. Terminal; only valid in the proposed phase.
    pub fn decline(&mut self, response: Decline) -> Result<(), Error> {
        let request = match &self.communication {
            SwapCommunication::Proposed { request } => request.clone(),
            SwapCommunication::Accepted { .. } | SwapCommunication::Declined { .. } => {
                return Err(Error::AlreadyAccepted)
            }
        };

        self.communication = SwapCommunication::Declined { request, response };

        Ok(())
    }

    /// Applies an observed ledger event.
    ///
    /// Exact replays of already-applied events are no-ops. Conflicting or
    /// out-of-order observations fail without changing any state.
    pub fn apply(&mut self, event: SwapEvent) -> Result<Transition, Error> {
        match &self.communication {
            SwapCommunication::Proposed { .. } => return Err(Error::NotYetAccepted),
            SwapCommunication::Declined { .. } => return Err(Error::SwapDeclined),
            SwapCommunication::Accepted { .. } => {}
        }

        let side = event.side();
        match event {
            SwapEvent::AlphaDeployed(deployed) | SwapEvent::BetaDeployed(deployed) => {
                self.apply_deployed(side, deployed)
            }
            SwapEvent::AlphaFunded(funded) | SwapEvent::BetaFunded(funded) => {
                self.apply_funded(side, funded)
            }
            SwapEvent::AlphaRedeemed(redeemed) | SwapEvent::BetaRedeemed(redeemed) => {
                let expected_hash = self.communication.request().secret_hash;
                if redeemed.secret.hash() != expected_hash {
                    return Err(Error::IncorrectSecret);
                }

                let secret = redeemed.secret;
                let transition = self
                    .ledger_state_mut(side)
                    .transition_to_redeemed(redeemed)
                    .map_err(|source| Error::Illegal { side, source })?;

                if transition == Transition::Applied {
                    self.secret = Some(secret);
                }

                Ok(transition)
            }
            SwapEvent::AlphaRefunded(refunded) | SwapEvent::BetaRefunded(refunded) => {
                if !self.timelock_elapsed(side) {
                    return Err(Error::RefundBeforeExpiry(side));
                }

                self.ledger_state_mut(side)
                    .transition_to_refunded(refunded)
                    .map_err(|source| Error::Illegal { side, source })
            }
            SwapEvent::AlphaTimelockElapsed | SwapEvent::BetaTimelockElapsed => {
                // Elapsing is monotonic, replays are naturally idempotent.
                let transition = if self.timelock_elapsed(side) {
                    Transition::Duplicate
                } else {
                    Transition::Applied
                };
                match side {
                    Side::Alpha => self.alpha_timelock_elapsed = true,
                    Side::Beta => self.beta_timelock_elapsed = true,
                }
                Ok(transition)
            }
        }
    }

    fn apply_deployed(&mut self, side: Side, deployed: Deployed) -> Result<Transition, Error> {
        // Deployments at a different location than the known HTLC are not
        // ours; observers sweeping a whole contract namespace may report
        // them. They are ignored, not errors.
        if let Some(known) = self.ledger_state(side).htlc_location() {
            if *known != deployed.location {
                tracing::warn!(
                    "ignoring deployment at unrelated location {} on {} leg",
                    deployed.location,
                    side
                );
                return Ok(Transition::Duplicate);
            }
        }

        let location = deployed.location.clone();

        let transition = self
            .ledger_state_mut(side)
            .transition_to_deployed(deployed)
            .map_err(|source| Error::Illegal { side, source })?;

        if transition == Transition::Applied {
            // Back-fill the locator into the derived parameters exactly once.
            let params = self
                .htlc_params_mut(side)
                .as_mut()
                .expect("accepted swap always has derived params");
            params.htlc_location = Some(location);
        }

        Ok(transition)
    }

    fn apply_funded(&mut self, side: Side, funded: Funded) -> Result<Transition, Error> {
        let params = self
            .htlc_params(side)
            .as_ref()
            .expect("accepted swap always has derived params");
        let minimum = params
            .asset
            .quantity()
            .saturating_sub(params.fee_tolerance);

        let correctly_funded = funded.quantity >= minimum;
        let ledger_state = self.ledger_state_mut(side);
        let result = if correctly_funded {
            ledger_state.transition_to_funded(funded)
        } else {
            ledger_state.transition_to_incorrectly_funded(funded)
        };

        result.map_err(|source| Error::Illegal { side, source })
    }

    pub fn ledger_state(&self, side: Side) -> &LedgerState {
        match side {
            Side::Alpha => &self.alpha_ledger_state,
            Side::Beta => &self.beta_ledger_state,
        }
    }

    fn ledger_state_mut(&mut self, side: Side) -> &mut LedgerState {
        match side {
            Side::Alpha => &mut self.alpha_ledger_state,
            Side::Beta => &mut self.beta_ledger_state,
        }
    }

    pub fn htlc_params(&self, side: Side) -> &Option<HtlcParams> {
        match side {
            Side::Alpha => &self.alpha_htlc_params,
            Side::Beta => &self.beta_htlc_params,
        }
    }

    fn htlc_params_mut(&mut self, side: Side) -> &mut Option<HtlcParams> {
        match side {
            Side::Alpha => &mut self.alpha_htlc_params,
            Side::Beta => &mut self.beta_htlc_params,
        }
    }

    pub fn timelock_elapsed(&self, side: Side) -> bool {
        match side {
            Side::Alpha => self.alpha_timelock_elapsed,
            Side::Beta => self.beta_timelock_elapsed,
        }
    }

    pub fn request(&self) -> &Request {
        self.communication.request()
    }

    /// Derives the compound swap state from the communication phase and the
    /// two per-leg HTLC states.
    ///
    /// A refund on either leg dominates, then beta-leg progress, so that the
    /// name always reflects the furthest irreversible step.
    pub fn state(&self) -> SwapStateName {
        match &self.communication {
            SwapCommunication::Proposed { .. } => return SwapStateName::Start,
            SwapCommunication::Declined { .. } => return SwapStateName::Rejected,
            SwapCommunication::Accepted { .. } => {}
        }

        let alpha = self.alpha_ledger_state.state();
        let beta = self.beta_ledger_state.state();

        match (alpha, beta) {
            (HtlcState::Refunded, _) | (_, HtlcState::Refunded) => SwapStateName::Refunded,
            (HtlcState::Redeemed, HtlcState::Redeemed) => SwapStateName::BothRedeemed,
            (_, HtlcState::Redeemed) => SwapStateName::AlphaFundedBetaRedeemed,
            (HtlcState::Redeemed, _) => SwapStateName::AlphaRedeemedBetaFunded,
            (HtlcState::Funded, HtlcState::Funded) => SwapStateName::BothFunded,
            (HtlcState::Funded, _) => SwapStateName::AlphaFunded,
            (HtlcState::Deployed, _) | (HtlcState::IncorrectlyFunded, _) => {
                SwapStateName::AlphaDeployed
            }
            _ => SwapStateName::Accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        asset::{Asset, Quantity},
        events::{Redeemed, Refunded},
        htlc_location::Locator,
        identity::Identity,
        ledger::{Ledger, Network},
        messages::SwapDeclineReason,
        transaction::TransactionId,
        HashFunction, RelativeTime, SwapId,
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

    fn accepted_alice() -> SwapState {
        let request = request();
        let response = response(request.swap_id);
        let mut state = SwapState::new_alice(request, secret()).unwrap();
        state
            .accept(response, &Config::default(), Timestamp::from(0))
            .unwrap();
        state
    }

    fn alpha_deployed() -> SwapEvent {
        SwapEvent::AlphaDeployed(Deployed {
            transaction: TransactionId::new(vec![0x01]),
            location: Locator::new(vec![0xaa]),
        })
    }

    fn alpha_funded() -> SwapEvent {
        SwapEvent::AlphaFunded(Funded {
            transaction: TransactionId::new(vec![0x02]),
            quantity: Quantity::new(5_000_000_000_000_000_000_000),
        })
    }

    #[test]
    fn alice_must_know_the_preimage_of_the_commitment() {
        let mut request = request();
        request.secret_hash = Secret::from([0u8; 32]).hash();

        let result = SwapState::new_alice(request, secret());

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidParameters(InvalidParameters::SecretMismatch)
        );
    }

    #[test]
    fn accept_is_exactly_once() {
        let mut state = accepted_alice();
        let response = response(state.request().swap_id);

        let result = state.accept(response, &Config::default(), Timestamp::from(0));

        assert_eq!(result.unwrap_err(), Error::AlreadyAccepted);
    }

    #[test]
    fn failed_derivation_leaves_the_swap_proposed() {
        let request = request();
        let mut response = response(request.swap_id);
        response.beta_lock_duration = RelativeTime::new(0);
        let mut state = SwapState::new_bob(request);

        let result = state.accept(response, &Config::default(), Timestamp::from(0));

        assert_that(&result).is_err();
        assert_eq!(state.state(), SwapStateName::Start);
        assert_that(&state.alpha_htlc_params).is_none();
    }

    #[test]
    fn events_before_acceptance_are_rejected() {
        let mut state = SwapState::new_bob(request());

        let result = state.apply(alpha_deployed());

        assert_eq!(result.unwrap_err(), Error::NotYetAccepted);
    }

    #[test]
    fn events_after_decline_are_rejected() {
        let mut state = SwapState::new_bob(request());
        state
            .decline(Decline {
                swap_id: state.request().swap_id,
                reason: Some(SwapDeclineReason::UnsatisfactoryRate),
            })
            .unwrap();
        assert_eq!(state.state(), SwapStateName::Rejected);

        let result = state.apply(alpha_deployed());

        assert_eq!(result.unwrap_err(), Error::SwapDeclined);
    }

    #[test]
    fn deployment_backfills_the_locator_exactly_once() {
        let mut state = accepted_alice();

        state.apply(alpha_deployed()).unwrap();

        let params = state.alpha_htlc_params.as_ref().unwrap();
        assert_eq!(params.htlc_location, Some(Locator::new(vec![0xaa])));

        // Replay leaves the locator untouched.
        let transition = state.apply(alpha_deployed()).unwrap();
        assert_eq!(transition, Transition::Duplicate);
        assert_eq!(
            state.alpha_htlc_params.as_ref().unwrap().htlc_location,
            Some(Locator::new(vec![0xaa]))
        );
    }

    #[test]
    fn deployments_at_unrelated_locations_are_ignored() {
        let mut state = accepted_alice();
        state.apply(alpha_deployed()).unwrap();

        let unrelated = SwapEvent::AlphaDeployed(Deployed {
            transaction: TransactionId::new(vec![0xff]),
            location: Locator::new(vec![0xde, 0xad]),
        });
        let transition = state.apply(unrelated).unwrap();

        assert_eq!(transition, Transition::Duplicate);
        assert_eq!(
            state.alpha_htlc_params.as_ref().unwrap().htlc_location,
            Some(Locator::new(vec![0xaa]))
        );
    }

    #[test]
    fn duplicate_funding_is_a_noop() {
        let mut state = accepted_alice();
        state.apply(alpha_deployed()).unwrap();
        state.apply(alpha_funded()).unwrap();

        let transition = state.apply(alpha_funded()).unwrap();

        assert_eq!(transition, Transition::Duplicate);
        assert_eq!(state.state(), SwapStateName::AlphaFunded);
    }

    #[test]
    fn short_funding_within_tolerance_still_counts() {
        let request = request();
        let response = response(request.swap_id);
        let mut state = SwapState::new_bob(request);
        let config = Config {
            native_fee_tolerance: Quantity::new(1_000),
            ..Config::default()
        };
        state.accept(response, &config, Timestamp::from(0)).unwrap();

        state.apply(alpha_deployed()).unwrap();
        state.apply(alpha_funded()).unwrap();
        state
            .apply(SwapEvent::BetaDeployed(Deployed {
                transaction: TransactionId::new(vec![0x03]),
                location: Locator::new(vec![0xbb]),
            }))
            .unwrap();
        state
            .apply(SwapEvent::BetaFunded(Funded {
                transaction: TransactionId::new(vec![0x04]),
                quantity: Quantity::new(100_000_000 - 500),
            }))
            .unwrap();

        assert_eq!(state.state(), SwapStateName::BothFunded);
    }

    #[test]
    fn short_funding_beyond_tolerance_is_incorrect() {
        let mut state = accepted_alice();
        state.apply(alpha_deployed()).unwrap();

        state
            .apply(SwapEvent::AlphaFunded(Funded {
                transaction: TransactionId::new(vec![0x02]),
                quantity: Quantity::new(1),
            }))
            .unwrap();

        assert_eq!(
            state.alpha_ledger_state.state(),
            HtlcState::IncorrectlyFunded
        );
        assert_eq!(state.state(), SwapStateName::AlphaDeployed);
    }

    #[test]
    fn redeem_with_wrong_secret_is_rejected() {
        let mut state = accepted_alice();
        state.apply(alpha_deployed()).unwrap();
        state.apply(alpha_funded()).unwrap();

        let result = state.apply(SwapEvent::AlphaRedeemed(Redeemed {
            transaction: TransactionId::new(vec![0x05]),
            secret: Secret::from([0u8; 32]),
        }));

        assert_eq!(result.unwrap_err(), Error::IncorrectSecret);
        assert_eq!(state.alpha_ledger_state.state(), HtlcState::Funded);
    }

    #[test]
    fn bob_captures_the_secret_from_an_observed_redeem() {
        let request = request();
        let response = response(request.swap_id);
        let mut state = SwapState::new_bob(request);
        state
            .accept(response, &Config::default(), Timestamp::from(0))
            .unwrap();
        assert_that(&state.secret).is_none();

        state.apply(alpha_deployed()).unwrap();
        state.apply(alpha_funded()).unwrap();
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
        state
            .apply(SwapEvent::BetaRedeemed(Redeemed {
                transaction: TransactionId::new(vec![0x05]),
                secret: secret(),
            }))
            .unwrap();

        assert_eq!(state.secret, Some(secret()));
        assert_eq!(state.state(), SwapStateName::AlphaFundedBetaRedeemed);
    }

    #[test]
    fn refund_requires_an_elapsed_timelock() {
        let mut state = accepted_alice();
        state.apply(alpha_deployed()).unwrap();
        state.apply(alpha_funded()).unwrap();

        let premature = state.apply(SwapEvent::AlphaRefunded(Refunded {
            transaction: TransactionId::new(vec![0x06]),
        }));
        assert_eq!(
            premature.unwrap_err(),
            Error::RefundBeforeExpiry(Side::Alpha)
        );

        state.apply(SwapEvent::AlphaTimelockElapsed).unwrap();
        state
            .apply(SwapEvent::AlphaRefunded(Refunded {
                transaction: TransactionId::new(vec![0x06]),
            }))
            .unwrap();

        assert_eq!(state.state(), SwapStateName::Refunded);
    }

    #[test]
    fn timelock_elapsed_is_idempotent() {
        let mut state = accepted_alice();

        assert_eq!(
            state.apply(SwapEvent::BetaTimelockElapsed).unwrap(),
            Transition::Applied
        );
        assert_eq!(
            state.apply(SwapEvent::BetaTimelockElapsed).unwrap(),
            Transition::Duplicate
        );
    }

    #[test]
    fn compound_state_names_follow_the_progression() {
        let mut state = accepted_alice();
        assert_eq!(state.state(), SwapStateName::Accepted);

        state.apply(alpha_deployed()).unwrap();
        assert_eq!(state.state(), SwapStateName::AlphaDeployed);

        state.apply(alpha_funded()).unwrap();
        assert_eq!(state.state(), SwapStateName::AlphaFunded);

        state
            .apply(SwapEvent::BetaDeployed(Deployed {
                transaction: TransactionId::new(vec![0x03]),
                location: Locator::new(vec![0xbb]),
            }))
            .unwrap();
        assert_eq!(state.state(), SwapStateName::AlphaFunded);

        state
            .apply(SwapEvent::BetaFunded(Funded {
                transaction: TransactionId::new(vec![0x04]),
                quantity: Quantity::new(100_000_000),
            }))
            .unwrap();
        assert_eq!(state.state(), SwapStateName::BothFunded);

        state
            .apply(SwapEvent::BetaRedeemed(Redeemed {
                transaction: TransactionId::new(vec![0x05]),
                secret: secret(),
            }))
            .unwrap();
        assert_eq!(state.state(), SwapStateName::AlphaFundedBetaRedeemed);

        state
            .apply(SwapEvent::AlphaRedeemed(Redeemed {
                transaction: TransactionId::new(vec![0x06]),
                secret: secret(),
            }))
            .unwrap();
        assert_eq!(state.state(), SwapStateName::BothRedeemed);
    }
}

use crate::{
    events::SwapEvent,
    htlc_params::Config,
    messages::{Accept, Decline, Request},
    resource::SwapResource,
    state_machine::{self, SwapState, SwapStateName},
    Secret, SwapId, Timestamp,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("swap {0} already exists")]
    DuplicateRequest(SwapId),
    #[error("swap {0} does not exist")]
    NoSwap(SwapId),
    #[error(transparent)]
    StateMachine(#[from] state_machine::Error),
}

struct Swap {
    state: Mutex<SwapState>,
    sender: watch::Sender<SwapStateName>,
    // Kept so subscribing is possible after all external receivers dropped.
    receiver: watch::Receiver<SwapStateName>,
}

impl Swap {
    fn new(state: SwapState) -> Self {
        let (sender, receiver) = watch::channel(state.state());
        Self {
            state: Mutex::new(state),
            sender,
            receiver,
        }
    }
}

/// Holds every swap known to this process, keyed by swap id.
///
/// The map lock is only ever held for a lookup; all work on a swap happens
/// under that swap's own lock, so operations on different swaps never
/// contend. Operations on the same swap are serialized, which is what makes
/// duplicate delivery and out-of-order delivery safe to reason about.
pub struct Registry {
    config: Config,
    swaps: Mutex<HashMap<SwapId, Arc<Swap>>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Registry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            swaps: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a swap with us in the role of the initiator.
    pub fn create_as_alice(&self, request: Request, secret: Secret) -> Result<SwapId, Error> {
        let state = SwapState::new_alice(request, secret).map_err(Error::StateMachine)?;
        self.insert(state)
    }

    /// Registers a swap with us in the role of the responder.
    pub fn create_as_bob(&self, request: Request) -> Result<SwapId, Error> {
        self.insert(SwapState::new_bob(request))
    }

    fn insert(&self, state: SwapState) -> Result<SwapId, Error> {
        let swap_id = state.request().swap_id;
        let mut swaps = self.swaps.lock().unwrap();

        if swaps.contains_key(&swap_id) {
            return Err(Error::DuplicateRequest(swap_id));
        }

        tracing::info!("creating swap {} as {}", swap_id, state.role);
        swaps.insert(swap_id, Arc::new(Swap::new(state)));

        Ok(swap_id)
    }

    pub fn accept(&self, swap_id: SwapId, response: Accept) -> Result<(), Error> {
        let swap = self.find(swap_id)?;
        let mut state = swap.state.lock().unwrap();

        state.accept(response, &self.config, Timestamp::now())?;
        tracing::info!("swap {} accepted", swap_id);
        let _ = swap.sender.send(state.state());

        Ok(())
    }

    pub fn decline(&self, swap_id: SwapId, response: Decline) -> Result<(), Error> {
        let swap = self.find(swap_id)?;
        let mut state = swap.state.lock().unwrap();

        state.decline(response)?;
        tracing::info!("swap {} declined", swap_id);
        let _ = swap.sender.send(state.state());

        Ok(())
    }

    /// Feeds an observed ledger event into the swap it belongs to.
    ///
    /// Returns the swap's compound state after the event. Duplicates are
    /// accepted and change nothing.
    pub fn apply_ledger_event(
        &self,
        swap_id: SwapId,
        event: SwapEvent,
    ) -> Result<SwapStateName, Error> {
        let swap = self.find(swap_id)?;
        let mut state = swap.state.lock().unwrap();

        tracing::info!("applying {} to swap {}", event, swap_id);
        state.apply(event)?;

        let name = state.state();
        let _ = swap.sender.send(name);

        Ok(name)
    }

    /// A snapshot of the swap's full state.
    pub fn get(&self, swap_id: SwapId) -> Option<SwapState> {
        let swap = self.find(swap_id).ok()?;
        let state = swap.state.lock().unwrap();

        Some(state.clone())
    }

    /// The serializable projection of the swap, for outward-facing layers.
    pub fn resource(&self, swap_id: SwapId) -> Option<SwapResource> {
        let swap = self.find(swap_id).ok()?;
        let state = swap.state.lock().unwrap();

        Some(SwapResource::new(swap_id, &state))
    }

    /// A channel that yields the compound state on every change, starting
    /// with the current one. Replaces polling for "state reached X".
    pub fn subscribe(&self, swap_id: SwapId) -> Option<watch::Receiver<SwapStateName>> {
        let swap = self.find(swap_id).ok()?;

        Some(swap.receiver.clone())
    }

    fn find(&self, swap_id: SwapId) -> Result<Arc<Swap>, Error> {
        self.swaps
            .lock()
            .unwrap()
            .get(&swap_id)
            .cloned()
            .ok_or(Error::NoSwap(swap_id))
    }
}

//! In-process gateway over a [`WorldState`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::contract::Contract;
use crate::state::{InMemoryWorldState, Invocation, StateError, WorldState};

use super::{Gateway, GatewayConfig, GatewayError};

type PersistFn<W> = dyn Fn(&W) -> Result<(), StateError> + Send + Sync;

/// Hosts a contract over a world state owned by this process.
///
/// Every call gets a fresh [`Invocation`] with id `tx-<n>`. Submits are
/// serialized through a lock so the persist hook always sees commits in
/// height order.
pub struct LocalGateway<W: WorldState> {
    config: GatewayConfig,
    contract: Contract,
    world: W,
    next_tx: AtomicU64,
    persist: Option<Box<PersistFn<W>>>,
    submit_lock: Mutex<()>,
}

impl<W: WorldState> LocalGateway<W> {
    pub fn new(config: GatewayConfig, contract: Contract, world: W) -> Self {
        Self {
            config,
            contract,
            world,
            next_tx: AtomicU64::new(1),
            persist: None,
            submit_lock: Mutex::new(()),
        }
    }

    /// Run `persist` after every successful commit.
    pub fn with_persist<F>(mut self, persist: F) -> Self
    where
        F: Fn(&W) -> Result<(), StateError> + Send + Sync + 'static,
    {
        self.persist = Some(Box::new(persist));
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    fn next_tx_id(&self) -> String {
        format!("tx-{}", self.next_tx.fetch_add(1, Ordering::Relaxed))
    }

    fn run(
        &self,
        invocation: &mut Invocation<'_, W>,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, GatewayError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.contract
            .invoke(invocation, function, &args)
            .map_err(|e| GatewayError::endorsement(function, &e))
    }
}

impl LocalGateway<InMemoryWorldState> {
    /// Open (or start) the world state at `path` and save a snapshot there
    /// after every successful submit.
    pub fn with_snapshot(
        config: GatewayConfig,
        contract: Contract,
        path: impl Into<PathBuf>,
    ) -> Result<Self, StateError> {
        let path = path.into();
        let world = InMemoryWorldState::open(&path)?;
        Ok(Self::new(config, contract, world).with_persist(move |world| world.save_snapshot(&path)))
    }
}

impl<W: WorldState> Gateway for LocalGateway<W> {
    fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        let mut invocation = Invocation::new(&self.world, self.next_tx_id());
        let payload = self.run(&mut invocation, function, args)?;
        debug!(function, discarded = invocation.pending_writes().count(), "evaluated");
        Ok(payload)
    }

    fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        let tx_id = self.next_tx_id();
        let mut invocation = Invocation::new(&self.world, tx_id.clone());
        let payload = self.run(&mut invocation, function, args)?;

        let _guard = self
            .submit_lock
            .lock()
            .map_err(|_| GatewayError::Commit {
                tx_id: tx_id.clone(),
                source: StateError::Unavailable("submit lock poisoned".into()),
            })?;

        let height = invocation.commit().map_err(|source| {
            warn!(tx_id = %tx_id, function, error = %source, "commit rejected");
            GatewayError::Commit {
                tx_id: tx_id.clone(),
                source,
            }
        })?;
        info!(tx_id = %tx_id, function, height, "committed");

        if let Some(persist) = &self.persist {
            persist(&self.world).map_err(GatewayError::Persist)?;
        }
        Ok(payload)
    }
}

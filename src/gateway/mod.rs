//! gateway - calling the contract by name from outside an invocation.
//!
//! A [`Gateway`] takes a function name and ordered string arguments and
//! returns the transaction's bytes. `evaluate_transaction` runs a query and
//! throws its writes away; `submit_transaction` runs and commits.
//!
//! [`LocalGateway`] hosts a [`Contract`](crate::contract::Contract) over an
//! in-process [`WorldState`](crate::state::WorldState). [`PersonnelClient`]
//! is the typed client used by the CLI.
//!
//! ## Example
//!
//! ```ignore
//! use starfleet_ledger::{personnel_contract, GatewayConfig, InMemoryWorldState, LocalGateway, PersonnelClient};
//!
//! let gateway = LocalGateway::new(GatewayConfig::default(), personnel_contract(), InMemoryWorldState::new());
//! let client = PersonnelClient::new(&gateway);
//! client.enroll_cadet("SF-001", "Malcom Reynolds", "Engineering")?;
//! let personnel = client.get_personnel("SF-001")?;
//! ```

mod client;
#[cfg(feature = "http")]
pub mod http;
mod local;

use std::sync::Arc;

use thiserror::Error;

use crate::contract::{status_for_kind, ContractError};
use crate::error::ErrorKind;
use crate::state::StateError;

pub use client::PersonnelClient;
pub use local::LocalGateway;

/// Which network and deployed contract a gateway talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub channel_name: String,
    pub chaincode_name: String,
}

impl GatewayConfig {
    pub fn new(channel_name: impl Into<String>, chaincode_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            chaincode_name: chaincode_name.into(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("channel", "chaincode")
    }
}

/// Error type for gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The contract rejected the transaction.
    #[error("{function} failed with status {status}: {message}")]
    Endorsement {
        function: String,
        status: u16,
        kind: ErrorKind,
        message: String,
    },

    /// The transaction ran but its writes could not be committed.
    #[error("failed to commit transaction {tx_id}: {source}")]
    Commit {
        tx_id: String,
        #[source]
        source: StateError,
    },

    /// Rejected by the client before reaching the contract.
    #[error("{0}")]
    InvalidRequest(String),

    /// The response bytes were not the expected JSON.
    #[error("failed to decode {function} response: {source}")]
    Decode {
        function: String,
        #[source]
        source: serde_json::Error,
    },

    /// Committed, but the world state could not be persisted afterwards.
    #[error("failed to persist world state: {0}")]
    Persist(#[source] StateError),
}

impl GatewayError {
    pub(crate) fn endorsement(function: &str, err: &ContractError) -> Self {
        GatewayError::Endorsement {
            function: function.to_string(),
            status: err.status_code(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Endorsement { kind, .. } => *kind,
            GatewayError::Commit {
                source: StateError::Conflict { .. },
                ..
            } => ErrorKind::Conflict,
            GatewayError::Commit { .. } | GatewayError::Persist(_) => ErrorKind::StoreUnavailable,
            GatewayError::InvalidRequest(_) => ErrorKind::InvalidArgument,
            GatewayError::Decode { .. } => ErrorKind::Corruption,
        }
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Endorsement { status, .. } => *status,
            _ => status_for_kind(self.kind()),
        }
    }

    /// Whether resubmitting the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::StoreUnavailable
        )
    }
}

/// Runs contract transactions by name.
pub trait Gateway {
    /// Run a transaction and discard its writes.
    fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError>;

    /// Run a transaction and commit its writes.
    fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError>;
}

impl<G: Gateway + ?Sized> Gateway for &G {
    fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        (**self).evaluate_transaction(function, args)
    }

    fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        (**self).submit_transaction(function, args)
    }
}

impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        (**self).evaluate_transaction(function, args)
    }

    fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        (**self).submit_transaction(function, args)
    }
}

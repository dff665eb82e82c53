//! Contract - transaction registry and dispatch.
//!
//! A `Contract` maps function names to handlers with a fixed parameter list.
//! `invoke` resolves the name (bare, or qualified as `"<Contract>:<Name>"`),
//! checks the argument count, and runs the handler against the stub.

use std::collections::HashMap;

use tracing::{debug, info_span, warn};

use crate::state::Stub;

use super::context::TransactionContext;
use super::error::ContractError;

type HandleFn =
    dyn Fn(&mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> + Send + Sync;

/// A registered transaction.
struct Transaction {
    params: &'static [&'static str],
    handle: Box<HandleFn>,
}

/// A named set of transactions invoked with ordered string arguments.
pub struct Contract {
    name: String,
    transactions: HashMap<String, Transaction>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transactions: HashMap::new(),
        }
    }

    /// Register a transaction.
    ///
    /// Uses builder pattern - returns `self` for chaining.
    pub fn transaction<F>(mut self, name: &str, params: &'static [&'static str], handler: F) -> Self
    where
        F: Fn(&mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> + Send + Sync + 'static,
    {
        self.transactions.insert(
            name.to_string(),
            Transaction {
                params,
                handle: Box::new(handler),
            },
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered transaction names, sorted.
    pub fn transactions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transactions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Strip an optional `"<Contract>:"` qualifier.
    fn resolve<'f>(&self, function: &'f str) -> Result<&'f str, ContractError> {
        let name = match function.split_once(':') {
            Some((contract, name)) if contract == self.name => name,
            Some(_) => return Err(ContractError::UnknownTransaction(function.to_string())),
            None => function,
        };
        if self.transactions.contains_key(name) {
            Ok(name)
        } else {
            Err(ContractError::UnknownTransaction(function.to_string()))
        }
    }

    /// Run one transaction against `stub`.
    pub fn invoke(
        &self,
        stub: &mut dyn Stub,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let span = info_span!("invoke", tx_id = stub.tx_id(), function);
        let _enter = span.enter();

        let name = self.resolve(function)?;
        let transaction = &self.transactions[name];

        if args.len() != transaction.params.len() {
            return Err(ContractError::IncorrectArgumentCount {
                function: name.to_string(),
                expected: transaction.params.len(),
                received: args.len(),
                params: transaction.params.join(", "),
            });
        }

        let mut ctx = TransactionContext::new(args, stub);
        match (transaction.handle)(&mut ctx) {
            Ok(payload) => {
                debug!(bytes = payload.len(), "transaction succeeded");
                Ok(payload)
            }
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "transaction failed");
                Err(e)
            }
        }
    }
}

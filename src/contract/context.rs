//! Context passed to transaction handlers.
//!
//! Carries the ordered string arguments and the invocation's stub.
//! Handlers reach the ledger through [`TransactionContext::ledger`].

use serde::Serialize;

use crate::ledger::PersonnelLedger;
use crate::state::Stub;

use super::error::ContractError;

/// The context passed to every transaction handler.
pub struct TransactionContext<'a> {
    args: &'a [String],
    stub: &'a mut dyn Stub,
}

impl<'a> TransactionContext<'a> {
    pub(crate) fn new(args: &'a [String], stub: &'a mut dyn Stub) -> Self {
        Self { args, stub }
    }

    /// Argument at `index`. Arity is checked before dispatch, so handlers
    /// can index up to their declared parameter count.
    pub fn arg(&self, index: usize) -> &'a str {
        self.args.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Ledger operations bound to this invocation.
    pub fn ledger(&mut self) -> PersonnelLedger<'_, dyn Stub + 'a> {
        PersonnelLedger::new(&mut *self.stub)
    }
}

/// Serialize a handler result as the transaction response.
pub fn respond<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ContractError> {
    Ok(serde_json::to_vec(value)?)
}

//! Error types for contract transactions.

use thiserror::Error;

use crate::error::{ErrorKind, LedgerError};

/// Error type for transaction dispatch and handlers.
#[derive(Debug, Error)]
pub enum ContractError {
    /// No transaction registered under this function name.
    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),

    /// Wrong number of string arguments for the transaction.
    #[error(
        "incorrect number of arguments for {function}: expected {expected} ({params}), received {received}"
    )]
    IncorrectArgumentCount {
        function: String,
        expected: usize,
        received: usize,
        params: String,
    },

    /// The ledger rejected the call.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The handler result could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::UnknownTransaction(_) | ContractError::IncorrectArgumentCount { .. } => {
                ErrorKind::InvalidArgument
            }
            ContractError::Ledger(e) => e.kind(),
            ContractError::Encode(_) => ErrorKind::Corruption,
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ContractError::UnknownTransaction(_) => 404,
            ContractError::IncorrectArgumentCount { .. } => 400,
            ContractError::Ledger(_) | ContractError::Encode(_) => status_for_kind(self.kind()),
        }
    }
}

/// HTTP-style status code for an error kind.
pub fn status_for_kind(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::InvalidArgument => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::AlreadyExists => 409,
        ErrorKind::FailedPrecondition => 412,
        ErrorKind::Corruption => 500,
        ErrorKind::StoreUnavailable | ErrorKind::Conflict => 503,
    }
}

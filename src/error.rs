use std::fmt;

use thiserror::Error;

use crate::domain::TimestampError;
use crate::keys::KeyError;
use crate::state::StateError;

/// Coarse classification of a [`LedgerError`], stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Corruption,
    StoreUnavailable,
    /// Optimistic concurrency conflict at commit; retry the whole invocation.
    Conflict,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::FailedPrecondition => "FailedPrecondition",
            ErrorKind::Corruption => "Corruption",
            ErrorKind::StoreUnavailable => "StoreUnavailable",
            ErrorKind::Conflict => "Conflict",
        };
        f.write_str(name)
    }
}

/// Error type for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{field} is required")]
    MissingArgument { field: &'static str },

    #[error("{field} must be an RFC 3339 date-time with offset, got {value:?}: {source}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: TimestampError,
    },

    #[error("invalid key component: {0}")]
    InvalidKey(#[from] KeyError),

    #[error("{doc_type} with ID [{id}] does not exist")]
    NotFound { doc_type: &'static str, id: String },

    #[error("{doc_type} with ID [{id}] already exists")]
    AlreadyExists { doc_type: &'static str, id: String },

    #[error(
        "qualification already held: personnel [{personnel_id}] has already completed training \
         [{training_code}] (record [{record_id}])"
    )]
    QualificationHeld {
        personnel_id: String,
        training_code: String,
        record_id: String,
    },

    #[error("cannot complete training for personnel [{personnel_id}] with status [{status}]")]
    InactivePersonnel {
        personnel_id: String,
        status: String,
    },

    #[error(
        "personnel [{personnel_id}] is not enrolled in campus [{requested}] (current campus [{current}])"
    )]
    CampusMismatch {
        personnel_id: String,
        requested: String,
        current: String,
    },

    #[error("stored value at {key:?} failed to decode: {source}")]
    Corruption {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("index entry {key:?} is malformed: {source}")]
    MalformedIndexEntry {
        key: String,
        #[source]
        source: KeyError,
    },

    #[error("failed to encode {doc_type} [{id}]: {source}")]
    Encode {
        doc_type: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::MissingArgument { .. }
            | LedgerError::InvalidTimestamp { .. }
            | LedgerError::InvalidKey(_) => ErrorKind::InvalidArgument,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::AlreadyExists { .. } | LedgerError::QualificationHeld { .. } => {
                ErrorKind::AlreadyExists
            }
            LedgerError::InactivePersonnel { .. } | LedgerError::CampusMismatch { .. } => {
                ErrorKind::FailedPrecondition
            }
            LedgerError::Corruption { .. }
            | LedgerError::MalformedIndexEntry { .. }
            | LedgerError::Encode { .. } => ErrorKind::Corruption,
            LedgerError::State(StateError::Conflict { .. }) => ErrorKind::Conflict,
            LedgerError::State(StateError::Key(_)) => ErrorKind::InvalidArgument,
            LedgerError::State(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Whether retrying the whole invocation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::StoreUnavailable
        )
    }
}

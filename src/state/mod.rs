//! World state - the host platform's key-value store and the per-invocation
//! view the ledger operates on.
//!
//! Two sides:
//!
//! - [`WorldState`] is the platform: versioned point reads, prefix scans, and
//!   an atomic `apply` of a read/write set. [`InMemoryWorldState`] is the
//!   bundled implementation.
//! - [`Stub`] is what ledger code sees during one invocation: `get_state`,
//!   `put_state`, and prefix iteration. [`Invocation`] implements it over any
//!   `WorldState`, buffering writes until `commit`.
//!
//! ## Example
//!
//! ```ignore
//! use starfleet_ledger::{InMemoryWorldState, Invocation, Stub};
//!
//! let world = InMemoryWorldState::new();
//! let mut inv = Invocation::new(&world, "tx-1");
//! inv.put_state("personnel:SF-001", b"{}".to_vec())?;
//! assert!(inv.get_state("personnel:SF-001")?.is_none()); // not yet committed
//! inv.commit()?;
//! ```

mod in_memory;
mod invocation;
mod snapshot;

use thiserror::Error;

use crate::keys::{partial_composite_key, KeyError};

pub use in_memory::InMemoryWorldState;
pub use invocation::{Invocation, RangeRead, ReadWriteSet};

/// A versioned wrapper around stored data. The version is the height of the
/// commit that last wrote the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// One entry yielded by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
    pub version: u64,
}

/// Error type for world state operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The store could not serve the call (poisoned lock, I/O, platform error).
    #[error("world state unavailable: {0}")]
    Unavailable(String),

    /// A key or range read during the invocation changed before commit.
    #[error("read conflict on {key:?}, state changed since it was read")]
    Conflict { key: String },

    /// Snapshot file could not be read or written.
    #[error("world state snapshot error: {0}")]
    Snapshot(String),

    /// A scan prefix could not be encoded.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// A lazy, finite sequence of entries from one prefix scan.
///
/// Holds the platform-side iterator open until [`close`](Self::close) is
/// called or the range is dropped, whichever comes first.
pub struct StateRange<'a> {
    entries: Box<dyn Iterator<Item = Result<KeyValue, StateError>> + 'a>,
    release: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> StateRange<'a> {
    /// Wrap an entry iterator with a release hook run exactly once.
    pub fn new<I, F>(entries: I, release: F) -> Self
    where
        I: Iterator<Item = Result<KeyValue, StateError>> + 'a,
        F: FnOnce() + 'a,
    {
        Self {
            entries: Box::new(entries),
            release: Some(Box::new(release)),
        }
    }

    /// A range over already-materialized entries with nothing to release.
    pub fn from_entries(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: Box::new(entries.into_iter().map(Ok)),
            release: None,
        }
    }

    /// Release the underlying iterator.
    pub fn close(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Iterator for StateRange<'_> {
    type Item = Result<KeyValue, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }
}

impl Drop for StateRange<'_> {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Per-invocation access to world state.
///
/// Object safe so transaction handlers can take `&mut dyn Stub`.
pub trait Stub {
    /// Identifier of the running invocation.
    fn tx_id(&self) -> &str;

    /// Point read. `None` when the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StateError>;

    /// Point write.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError>;

    /// All entries whose key starts with `prefix`, in lexical key order.
    fn get_state_by_prefix(&self, prefix: &str) -> Result<StateRange<'_>, StateError>;

    /// All entries of composite index `object_type` whose leading attributes
    /// equal `attributes`.
    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<StateRange<'_>, StateError> {
        let prefix = partial_composite_key(object_type, attributes)?;
        self.get_state_by_prefix(&prefix)
    }
}

/// The platform's committed store.
pub trait WorldState: Send + Sync {
    /// Versioned point read of committed state.
    fn read(&self, key: &str) -> Result<Option<Versioned<Vec<u8>>>, StateError>;

    /// Prefix scan of committed state, in lexical key order.
    fn scan(&self, prefix: &str) -> Result<StateRange<'static>, StateError>;

    /// Validate the read set against current state and, if nothing changed,
    /// apply every write as one commit. Returns the new height.
    fn apply(&self, rwset: ReadWriteSet) -> Result<u64, StateError>;

    /// Number of commits applied so far.
    fn height(&self) -> Result<u64, StateError>;
}

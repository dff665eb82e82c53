//! InMemoryWorldState - BTreeMap-backed world state for tests, the CLI and
//! the HTTP server.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::{KeyValue, ReadWriteSet, StateError, StateRange, Versioned, WorldState};

/// Internal stored representation of a value.
#[derive(Debug, Clone)]
pub(super) struct StoredValue {
    pub(super) bytes: Vec<u8>,
    pub(super) version: u64,
}

#[derive(Debug, Default)]
pub(super) struct Table {
    pub(super) height: u64,
    pub(super) entries: BTreeMap<String, StoredValue>,
}

impl Table {
    fn scan(&self, prefix: &str) -> impl Iterator<Item = (&String, &StoredValue)> + '_ {
        let prefix = prefix.to_string();
        self.entries
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
    }
}

/// In-memory world state backed by an ordered map.
///
/// Clone-friendly via Arc; clones share the same table.
#[derive(Clone, Default)]
pub struct InMemoryWorldState {
    pub(super) table: Arc<RwLock<Table>>,
    open_iterators: Arc<AtomicUsize>,
}

impl InMemoryWorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn from_table(table: Table) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of scan iterators handed out and not yet released.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Every committed entry, in key order.
    pub fn entries(&self) -> Result<Vec<KeyValue>, StateError> {
        let table = self
            .table
            .read()
            .map_err(|_| StateError::Unavailable("lock poisoned".into()))?;
        Ok(table
            .entries
            .iter()
            .map(|(key, stored)| KeyValue {
                key: key.clone(),
                value: stored.bytes.clone(),
                version: stored.version,
            })
            .collect())
    }
}

impl WorldState for InMemoryWorldState {
    fn read(&self, key: &str) -> Result<Option<Versioned<Vec<u8>>>, StateError> {
        let table = self
            .table
            .read()
            .map_err(|_| StateError::Unavailable("lock poisoned".into()))?;

        Ok(table.entries.get(key).map(|stored| Versioned {
            data: stored.bytes.clone(),
            version: stored.version,
        }))
    }

    fn scan(&self, prefix: &str) -> Result<StateRange<'static>, StateError> {
        let entries: Vec<KeyValue> = {
            let table = self
                .table
                .read()
                .map_err(|_| StateError::Unavailable("lock poisoned".into()))?;
            table
                .scan(prefix)
                .map(|(key, stored)| KeyValue {
                    key: key.clone(),
                    value: stored.bytes.clone(),
                    version: stored.version,
                })
                .collect()
        };

        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        let open = self.open_iterators.clone();
        Ok(StateRange::new(entries.into_iter().map(Ok), move || {
            open.fetch_sub(1, Ordering::SeqCst);
        }))
    }

    fn apply(&self, rwset: ReadWriteSet) -> Result<u64, StateError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| StateError::Unavailable("lock poisoned".into()))?;

        for (key, expected) in &rwset.reads {
            let actual = table.entries.get(key).map(|s| s.version);
            if actual != *expected {
                warn!(tx_id = %rwset.tx_id, key = ?key, ?expected, ?actual, "read conflict");
                return Err(StateError::Conflict { key: key.clone() });
            }
        }

        for range in &rwset.ranges {
            let current: Vec<(String, u64)> = table
                .scan(&range.prefix)
                .map(|(key, stored)| (key.clone(), stored.version))
                .collect();
            if current != range.observed {
                warn!(tx_id = %rwset.tx_id, prefix = ?range.prefix, "range conflict");
                return Err(StateError::Conflict {
                    key: range.prefix.clone(),
                });
            }
        }

        if rwset.writes.is_empty() {
            return Ok(table.height);
        }

        table.height += 1;
        let version = table.height;
        let count = rwset.writes.len();
        for (key, bytes) in rwset.writes {
            table.entries.insert(key, StoredValue { bytes, version });
        }

        debug!(tx_id = %rwset.tx_id, height = version, writes = count, "committed");
        Ok(version)
    }

    fn height(&self) -> Result<u64, StateError> {
        let table = self
            .table
            .read()
            .map_err(|_| StateError::Unavailable("lock poisoned".into()))?;
        Ok(table.height)
    }
}

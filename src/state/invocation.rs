//! Invocation - one transaction's view of world state.
//!
//! Reads go straight to committed state and are recorded with the version
//! they observed. Writes are buffered and are not visible to reads made by
//! the same invocation. `commit` hands the whole read/write set to the world
//! state, which rejects it if anything that was read has changed since.

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::debug;

use super::{KeyValue, StateError, StateRange, Stub, WorldState};

/// A prefix scan made during an invocation and the keys it observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRead {
    pub prefix: String,
    pub observed: Vec<(String, u64)>,
}

/// Everything an invocation read and wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    pub tx_id: String,
    /// Key -> version observed (`None` if the key was absent).
    pub reads: BTreeMap<String, Option<u64>>,
    pub ranges: Vec<RangeRead>,
    pub writes: BTreeMap<String, Vec<u8>>,
}

#[derive(Default)]
struct ReadSet {
    keys: BTreeMap<String, Option<u64>>,
    ranges: Vec<RangeRead>,
}

/// A [`Stub`] over a [`WorldState`] with buffered writes.
pub struct Invocation<'w, W: WorldState + ?Sized> {
    tx_id: String,
    world: &'w W,
    reads: RefCell<ReadSet>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl<'w, W: WorldState + ?Sized> Invocation<'w, W> {
    pub fn new(world: &'w W, tx_id: impl Into<String>) -> Self {
        Self {
            tx_id: tx_id.into(),
            world,
            reads: RefCell::new(ReadSet::default()),
            writes: BTreeMap::new(),
        }
    }

    /// Buffered writes, in key order.
    pub fn pending_writes(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.writes.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Consume the invocation into its read/write set.
    pub fn into_read_write_set(self) -> ReadWriteSet {
        let reads = self.reads.into_inner();
        ReadWriteSet {
            tx_id: self.tx_id,
            reads: reads.keys,
            ranges: reads.ranges,
            writes: self.writes,
        }
    }

    /// Validate and apply the buffered writes as one commit.
    pub fn commit(self) -> Result<u64, StateError> {
        let world = self.world;
        let rwset = self.into_read_write_set();
        debug!(
            tx_id = %rwset.tx_id,
            reads = rwset.reads.len(),
            ranges = rwset.ranges.len(),
            writes = rwset.writes.len(),
            "committing invocation"
        );
        world.apply(rwset)
    }
}

impl<W: WorldState + ?Sized> Stub for Invocation<'_, W> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        let current = self.world.read(key)?;
        self.reads
            .borrow_mut()
            .keys
            .entry(key.to_string())
            .or_insert_with(|| current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.data))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_prefix(&self, prefix: &str) -> Result<StateRange<'_>, StateError> {
        let mut upstream = self.world.scan(prefix)?;
        let entries: Vec<KeyValue> = upstream.by_ref().collect::<Result<_, _>>()?;

        self.reads.borrow_mut().ranges.push(RangeRead {
            prefix: prefix.to_string(),
            observed: entries
                .iter()
                .map(|kv| (kv.key.clone(), kv.version))
                .collect(),
        });

        Ok(StateRange::new(entries.into_iter().map(Ok), move || {
            upstream.close()
        }))
    }
}

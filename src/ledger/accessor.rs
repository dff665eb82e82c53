//! Typed access to world state through any [`Stub`].
//!
//! Reads go through [`Documents`] (primary records) and [`IndexScan`]
//! (secondary index entries). Writes are queued on a [`WriteBatch`] so every
//! key and value is built before the first `put_state`, then flushed together.

use std::marker::PhantomData;

use tracing::{trace, warn};

use crate::domain::Document;
use crate::error::LedgerError;
use crate::keys::state_key;
use crate::state::{StateRange, Stub};

use super::index::IndexEntry;

/// Value stored under every index key. The payload lives in the key.
pub const INDEX_MARKER: [u8; 1] = [0x00];

/// Typed reader for primary records of one document type.
pub struct Documents<'a, S: ?Sized, D> {
    stub: &'a S,
    _marker: PhantomData<fn() -> D>,
}

impl<'a, S: Stub + ?Sized, D: Document> Documents<'a, S, D> {
    pub fn new(stub: &'a S) -> Self {
        Self {
            stub,
            _marker: PhantomData,
        }
    }

    /// Get a record by natural id. Bytes that fail to decode are corruption,
    /// never absence.
    pub fn get(&self, id: &str) -> Result<Option<D>, LedgerError> {
        let key = state_key(D::DOC_TYPE, id)?;
        match self.stub.get_state(&key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| LedgerError::Corruption { key, source }),
            None => Ok(None),
        }
    }

    /// Get a record by natural id, failing with `NotFound` when absent.
    pub fn require(&self, id: &str) -> Result<D, LedgerError> {
        self.get(id)?.ok_or_else(|| LedgerError::NotFound {
            doc_type: D::DOC_TYPE,
            id: id.to_string(),
        })
    }

    /// Whether anything is stored at the record's key, without decoding it.
    pub fn exists(&self, id: &str) -> Result<bool, LedgerError> {
        let key = state_key(D::DOC_TYPE, id)?;
        Ok(self.stub.get_state(&key)?.is_some())
    }

    /// Every record of this type, in id order. Stops at the first record that
    /// fails to decode.
    pub fn all(&self) -> Result<Vec<D>, LedgerError> {
        let prefix = format!("{}:", D::DOC_TYPE);
        let range = self.stub.get_state_by_prefix(&prefix)?;
        let mut docs = Vec::new();
        for kv in range {
            let kv = kv?;
            let doc = serde_json::from_slice(&kv.value).map_err(|source| {
                LedgerError::Corruption {
                    key: kv.key.clone(),
                    source,
                }
            })?;
            docs.push(doc);
        }
        Ok(docs)
    }
}

/// Entries of one secondary index matching a prefix, decoded into `E`.
///
/// The underlying range is released when the scan is dropped, including on
/// early return from a loop over it.
pub struct IndexScan<'a, E> {
    range: StateRange<'a>,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, E: IndexEntry + 'a> IndexScan<'a, E> {
    /// Decoded entries only. Keys under the prefix that do not decode as an
    /// entry of `E` are logged and skipped.
    pub fn well_formed(self) -> impl Iterator<Item = Result<E, LedgerError>> + 'a {
        self.filter(|entry| match entry {
            Err(LedgerError::MalformedIndexEntry { key, source }) => {
                warn!(index = E::INDEX.name, key = ?key, error = %source, "skipping malformed index entry");
                false
            }
            _ => true,
        })
    }
}

impl<E: IndexEntry> Iterator for IndexScan<'_, E> {
    type Item = Result<E, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let kv = match self.range.next()? {
            Ok(kv) => kv,
            Err(e) => return Some(Err(e.into())),
        };
        Some(
            E::decode(&kv.key).map_err(|source| LedgerError::MalformedIndexEntry {
                key: kv.key,
                source,
            }),
        )
    }
}

/// Extension trait for typed ledger access on any [`Stub`].
pub trait StateAccessExt: Stub {
    /// Get a typed reader for one document type.
    fn documents<D: Document>(&self) -> Documents<'_, Self, D> {
        Documents::new(self)
    }

    /// Scan index `E` for entries whose leading fields equal `prefix`.
    fn scan_index<E: IndexEntry>(&self, prefix: &[&str]) -> Result<IndexScan<'_, E>, LedgerError> {
        E::INDEX.check_prefix(prefix)?;
        trace!(index = E::INDEX.name, fields = prefix.len(), "scanning index");
        let range = self.get_state_by_partial_composite_key(E::INDEX.name, prefix)?;
        Ok(IndexScan {
            range,
            _marker: PhantomData,
        })
    }
}

impl<S: Stub + ?Sized> StateAccessExt for S {}

/// A queued write (type-erased).
struct QueuedWrite {
    key: String,
    bytes: Vec<u8>,
}

/// Builder that prepares every write of one operation before touching the
/// store.
#[derive(Default)]
pub struct WriteBatch {
    writes: Vec<QueuedWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a primary record at its `"<doc_type>:<id>"` key.
    pub fn document<D: Document>(mut self, doc: &D) -> Result<Self, LedgerError> {
        let key = doc.state_key()?;
        let bytes = serde_json::to_vec(doc).map_err(|source| LedgerError::Encode {
            doc_type: D::DOC_TYPE,
            id: doc.id().to_string(),
            source,
        })?;
        self.writes.push(QueuedWrite { key, bytes });
        Ok(self)
    }

    /// Queue an index entry with the marker value.
    pub fn index_entry<E: IndexEntry>(mut self, entry: &E) -> Result<Self, LedgerError> {
        let key = entry.key()?;
        self.writes.push(QueuedWrite {
            key,
            bytes: INDEX_MARKER.to_vec(),
        });
        Ok(self)
    }

    /// Write everything, in queue order.
    pub fn apply<S: Stub + ?Sized>(self, stub: &mut S) -> Result<(), LedgerError> {
        trace!(tx_id = stub.tx_id(), writes = self.writes.len(), "applying write batch");
        for queued in self.writes {
            stub.put_state(&queued.key, queued.bytes)?;
        }
        Ok(())
    }
}

//! Snapshot persistence for [`InMemoryWorldState`].
//!
//! The whole table is bitcode-encoded and written to a sibling temp file,
//! then renamed over the target so a crash never leaves a torn snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::in_memory::{StoredValue, Table};
use super::{InMemoryWorldState, StateError};

#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    key: String,
    value: Vec<u8>,
    version: u64,
}

#[derive(Serialize, Deserialize)]
struct StateSnapshot {
    height: u64,
    entries: Vec<SnapshotEntry>,
}

fn temp_path(path: &Path) -> Result<PathBuf, StateError> {
    let mut name = path
        .file_name()
        .ok_or_else(|| StateError::Snapshot(format!("{} has no file name", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

impl InMemoryWorldState {
    /// Write the committed table to `path`.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        let path = path.as_ref();
        let tmp = temp_path(path)?;
        let snapshot = {
            let table = self
                .table
                .read()
                .map_err(|_| StateError::Unavailable("lock poisoned".into()))?;
            StateSnapshot {
                height: table.height,
                entries: table
                    .entries
                    .iter()
                    .map(|(key, stored)| SnapshotEntry {
                        key: key.clone(),
                        value: stored.bytes.clone(),
                        version: stored.version,
                    })
                    .collect(),
            }
        };

        let bytes = bitcode::serialize(&snapshot)
            .map_err(|e| StateError::Snapshot(format!("encode: {e}")))?;
        fs::write(&tmp, &bytes)
            .map_err(|e| StateError::Snapshot(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| StateError::Snapshot(format!("rename {}: {e}", path.display())))?;

        debug!(path = %path.display(), height = snapshot.height, bytes = bytes.len(), "snapshot saved");
        Ok(())
    }

    /// Load a world state previously written by [`save_snapshot`](Self::save_snapshot).
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| StateError::Snapshot(format!("read {}: {e}", path.display())))?;
        let snapshot: StateSnapshot = bitcode::deserialize(&bytes)
            .map_err(|e| StateError::Snapshot(format!("decode {}: {e}", path.display())))?;

        let table = Table {
            height: snapshot.height,
            entries: snapshot
                .entries
                .into_iter()
                .map(|e| {
                    (
                        e.key,
                        StoredValue {
                            bytes: e.value,
                            version: e.version,
                        },
                    )
                })
                .collect(),
        };

        info!(path = %path.display(), height = table.height, keys = table.entries.len(), "snapshot loaded");
        Ok(Self::from_table(table))
    }

    /// Load `path` if it exists, otherwise start empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_snapshot(path)
        } else {
            Ok(Self::new())
        }
    }
}

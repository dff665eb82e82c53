//! Domain model - personnel and completed-training records.
//!
//! Records are plain serde structs. Each record type implements [`Document`],
//! which ties it to a doc-type tag used as the prefix of its primary key
//! (`"personnel:SF-001"`, `"training:TR-001"`).
//!
//! ## Example
//!
//! ```ignore
//! use starfleet_ledger::{Document, Personnel};
//!
//! let cadet = Personnel::cadet("SF-001", "Malcom Reynolds", "Engineering");
//! assert_eq!(cadet.state_key()?, "personnel:SF-001");
//! ```

mod personnel;
mod training;

use serde::{de::DeserializeOwned, Serialize};

use crate::keys::{state_key, KeyError};

/// Trait for records stored under a primary `"<doc_type>:<id>"` key.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The doc-type tag for this record type (e.g., "personnel", "training").
    const DOC_TYPE: &'static str;

    /// Returns the natural identifier of this record.
    fn id(&self) -> &str;

    /// The primary world-state key for this record.
    fn state_key(&self) -> Result<String, KeyError> {
        state_key(Self::DOC_TYPE, self.id())
    }
}

pub use personnel::{Personnel, PersonnelStatus, Rank};
pub use training::{parse_timestamp, TimestampError, TrainingRecord, TrainingStatus};

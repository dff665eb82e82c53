//! Ledger operations over one invocation's [`Stub`].
//!
//! `PersonnelLedger` is the only writer of personnel records, training
//! records, and the two training indexes. Every operation performs all of its
//! reads and checks before its first write, so a failed call never leaves a
//! partial write behind.
//!
//! ## Example
//!
//! ```ignore
//! use starfleet_ledger::{InMemoryWorldState, Invocation, PersonnelLedger};
//!
//! let world = InMemoryWorldState::new();
//! let mut inv = Invocation::new(&world, "tx-1");
//! PersonnelLedger::new(&mut inv).enroll_cadet("SF-001", "Malcom Reynolds", "Engineering")?;
//! inv.commit()?;
//! ```

mod accessor;
mod index;
mod personnel;
mod queries;
mod training;

use crate::error::LedgerError;
use crate::state::Stub;

pub use accessor::{Documents, IndexScan, StateAccessExt, WriteBatch, INDEX_MARKER};
pub use index::{IndexEntry, TrainingByCode, TrainingByPersonnel};
pub use queries::IndexAudit;

/// Personnel and training operations bound to one invocation.
pub struct PersonnelLedger<'s, S: Stub + ?Sized> {
    stub: &'s mut S,
}

impl<'s, S: Stub + ?Sized> PersonnelLedger<'s, S> {
    pub fn new(stub: &'s mut S) -> Self {
        Self { stub }
    }
}

/// Fail with `MissingArgument` naming the first empty field.
fn require_present(fields: &[(&'static str, &str)]) -> Result<(), LedgerError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(LedgerError::MissingArgument { field: *field }),
        None => Ok(()),
    }
}

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::domain::{TrainingRecord, TrainingStatus};
use crate::error::LedgerError;
use crate::keys::KeyError;
use crate::state::Stub;

use super::{IndexEntry, PersonnelLedger, StateAccessExt, TrainingByCode, TrainingByPersonnel};

/// Result of cross-checking training records against both indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexAudit {
    /// Number of primary training records.
    pub records: usize,
    /// Index keys with no matching primary record, or malformed.
    pub orphaned_entries: Vec<String>,
    /// Index keys a primary record implies but that are absent.
    pub missing_entries: Vec<String>,
}

impl IndexAudit {
    pub fn is_consistent(&self) -> bool {
        self.orphaned_entries.is_empty() && self.missing_entries.is_empty()
    }
}

impl<S: Stub + ?Sized> PersonnelLedger<'_, S> {
    /// Read one training record.
    pub fn get_training_record(&self, record_id: &str) -> Result<TrainingRecord, LedgerError> {
        self.stub.documents::<TrainingRecord>().require(record_id)
    }

    /// Every training record of one person, in by-personnel index order.
    pub fn training_history(&self, personnel_id: &str) -> Result<Vec<TrainingRecord>, LedgerError> {
        self.get_personnel(personnel_id)?;

        let records = self.stub.documents::<TrainingRecord>();
        let mut history = Vec::new();
        for entry in self
            .stub
            .scan_index::<TrainingByPersonnel>(&[personnel_id])?
            .well_formed()
        {
            let entry = entry?;
            match records.get(&entry.record_id)? {
                Some(record) => history.push(record),
                None => warn!(
                    record_id = %entry.record_id,
                    personnel_id,
                    "timeline entry references missing training record"
                ),
            }
        }

        debug!(personnel_id, records = history.len(), "training history");
        Ok(history)
    }

    /// Every `Completed` record for one training code, ordered by personnel id.
    pub fn training_roster(&self, training_code: &str) -> Result<Vec<TrainingRecord>, LedgerError> {
        let records = self.stub.documents::<TrainingRecord>();
        let mut roster = Vec::new();
        for entry in self
            .stub
            .scan_index::<TrainingByCode>(&[training_code])?
            .well_formed()
        {
            let entry = entry?;
            match records.get(&entry.record_id)? {
                Some(record) if record.status == TrainingStatus::Completed => roster.push(record),
                Some(_) => {}
                None => warn!(
                    record_id = %entry.record_id,
                    training_code,
                    "roster entry references missing training record"
                ),
            }
        }

        debug!(training_code, records = roster.len(), "training roster");
        Ok(roster)
    }

    /// Check that every training record has exactly its two index entries and
    /// that no index entry lacks a record.
    pub fn audit_training_indexes(&self) -> Result<IndexAudit, LedgerError> {
        let records = self.stub.documents::<TrainingRecord>().all()?;

        let mut expected = BTreeSet::new();
        for record in &records {
            expected.insert(TrainingByPersonnel::from(record).key()?);
            expected.insert(TrainingByCode::from(record).key()?);
        }

        let mut actual = BTreeSet::new();
        let mut orphaned = Vec::new();
        collect_index_keys::<TrainingByPersonnel, S>(&*self.stub, &mut actual, &mut orphaned)?;
        collect_index_keys::<TrainingByCode, S>(&*self.stub, &mut actual, &mut orphaned)?;

        orphaned.extend(actual.difference(&expected).cloned());
        let missing: Vec<String> = expected.difference(&actual).cloned().collect();

        let audit = IndexAudit {
            records: records.len(),
            orphaned_entries: orphaned,
            missing_entries: missing,
        };
        if !audit.is_consistent() {
            warn!(
                orphaned = audit.orphaned_entries.len(),
                missing = audit.missing_entries.len(),
                "training indexes inconsistent"
            );
        }
        Ok(audit)
    }
}

/// Gather all keys of index `E`. Well-formed keys go to `keys`, malformed
/// ones straight to `malformed`.
fn collect_index_keys<E: IndexEntry, S: Stub + ?Sized>(
    stub: &S,
    keys: &mut BTreeSet<String>,
    malformed: &mut Vec<String>,
) -> Result<(), LedgerError> {
    for kv in stub.get_state_by_partial_composite_key(E::INDEX.name, &[])? {
        let kv = kv?;
        match E::decode(&kv.key) {
            Ok(_) => {
                keys.insert(kv.key);
            }
            Err(KeyError::Malformed { .. } | KeyError::Arity { .. } | KeyError::WrongIndex { .. }) => {
                malformed.push(kv.key);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

use tracing::{debug, info, warn};

use crate::domain::{parse_timestamp, Document, TrainingRecord, TrainingStatus};
use crate::error::LedgerError;
use crate::state::Stub;

use super::{
    require_present, PersonnelLedger, StateAccessExt, TrainingByCode, TrainingByPersonnel,
    WriteBatch,
};

impl<S: Stub + ?Sized> PersonnelLedger<'_, S> {
    /// Record a completed training for an active member of personnel.
    ///
    /// Writes the primary record plus one `training_byPersonnel` and one
    /// `training_byCode` entry, and nothing at all if any check fails.
    pub fn complete_training(
        &mut self,
        record_id: &str,
        personnel_id: &str,
        campus: &str,
        training_code: &str,
        completed_at: &str,
        issued_by: &str,
    ) -> Result<TrainingRecord, LedgerError> {
        require_present(&[
            ("recordID", record_id),
            ("personnelID", personnel_id),
            ("campus", campus),
            ("trainingCode", training_code),
            ("completedAt", completed_at),
            ("issuedBy", issued_by),
        ])?;

        parse_timestamp(completed_at).map_err(|source| {
            LedgerError::InvalidTimestamp {
                field: "completedAt",
                value: completed_at.to_string(),
                source,
            }
        })?;

        if self.stub.documents::<TrainingRecord>().exists(record_id)? {
            return Err(LedgerError::AlreadyExists {
                doc_type: TrainingRecord::DOC_TYPE,
                id: record_id.to_string(),
            });
        }

        let personnel = self.get_personnel(personnel_id)?;
        if !personnel.is_active() {
            return Err(LedgerError::InactivePersonnel {
                personnel_id: personnel_id.to_string(),
                status: personnel.status.to_string(),
            });
        }
        if personnel.campus != campus {
            return Err(LedgerError::CampusMismatch {
                personnel_id: personnel_id.to_string(),
                requested: campus.to_string(),
                current: personnel.campus,
            });
        }

        if let Some(held) = self.held_qualification(training_code, personnel_id)? {
            return Err(LedgerError::QualificationHeld {
                personnel_id: personnel_id.to_string(),
                training_code: training_code.to_string(),
                record_id: held.record_id,
            });
        }

        let record = TrainingRecord {
            record_id: record_id.to_string(),
            personnel_id: personnel_id.to_string(),
            campus: campus.to_string(),
            training_code: training_code.to_string(),
            completed_at: completed_at.to_string(),
            issued_by: issued_by.to_string(),
            status: TrainingStatus::Completed,
        };

        WriteBatch::new()
            .document(&record)?
            .index_entry(&TrainingByPersonnel::from(&record))?
            .index_entry(&TrainingByCode::from(&record))?
            .apply(&mut *self.stub)?;

        info!(
            tx_id = self.stub.tx_id(),
            record_id,
            personnel_id,
            training_code,
            "training completed"
        );
        Ok(record)
    }

    /// The `Completed` record for this (code, person) pair, if one exists.
    ///
    /// Malformed index keys and entries whose primary record is missing are
    /// skipped.
    fn held_qualification(
        &self,
        training_code: &str,
        personnel_id: &str,
    ) -> Result<Option<TrainingRecord>, LedgerError> {
        let records = self.stub.documents::<TrainingRecord>();
        let entries = self
            .stub
            .scan_index::<TrainingByCode>(&[training_code, personnel_id])?;

        for entry in entries.well_formed() {
            let entry = entry?;
            match records.get(&entry.record_id)? {
                Some(record) if record.is_completed() => return Ok(Some(record)),
                Some(record) => {
                    debug!(record_id = %record.record_id, status = %record.status, "ignoring non-completed record");
                }
                None => {
                    warn!(
                        record_id = %entry.record_id,
                        personnel_id,
                        training_code,
                        "index entry references missing training record"
                    );
                }
            }
        }

        Ok(None)
    }
}

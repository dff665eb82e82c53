//! Typed secondary index entries for training records.

use crate::domain::TrainingRecord;
use crate::keys::{IndexDef, KeyError, TRAINING_BY_CODE, TRAINING_BY_PERSONNEL};

/// A decoded entry of a secondary index.
pub trait IndexEntry: Sized {
    const INDEX: IndexDef;

    /// Field values in index order.
    fn values(&self) -> Vec<&str>;

    /// Build from decoded field values. `fields.len()` equals the index arity.
    fn from_fields(fields: Vec<String>) -> Self;

    fn key(&self) -> Result<String, KeyError> {
        Self::INDEX.key(&self.values())
    }

    fn decode(key: &str) -> Result<Self, KeyError> {
        Self::INDEX.decode(key).map(Self::from_fields)
    }
}

/// `training_byPersonnel` entry: a person's training timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingByPersonnel {
    pub personnel_id: String,
    pub completed_at: String,
    pub record_id: String,
}

/// `training_byCode` entry: who completed a training code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingByCode {
    pub training_code: String,
    pub personnel_id: String,
    pub record_id: String,
}

impl IndexEntry for TrainingByPersonnel {
    const INDEX: IndexDef = TRAINING_BY_PERSONNEL;

    fn values(&self) -> Vec<&str> {
        vec![
            self.personnel_id.as_str(),
            self.completed_at.as_str(),
            self.record_id.as_str(),
        ]
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            personnel_id: fields.next().unwrap_or_default(),
            completed_at: fields.next().unwrap_or_default(),
            record_id: fields.next().unwrap_or_default(),
        }
    }
}

impl IndexEntry for TrainingByCode {
    const INDEX: IndexDef = TRAINING_BY_CODE;

    fn values(&self) -> Vec<&str> {
        vec![
            self.training_code.as_str(),
            self.personnel_id.as_str(),
            self.record_id.as_str(),
        ]
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            training_code: fields.next().unwrap_or_default(),
            personnel_id: fields.next().unwrap_or_default(),
            record_id: fields.next().unwrap_or_default(),
        }
    }
}

impl From<&TrainingRecord> for TrainingByPersonnel {
    fn from(record: &TrainingRecord) -> Self {
        Self {
            personnel_id: record.personnel_id.clone(),
            completed_at: record.completed_at.clone(),
            record_id: record.record_id.clone(),
        }
    }
}

impl From<&TrainingRecord> for TrainingByCode {
    fn from(record: &TrainingRecord) -> Self {
        Self {
            training_code: record.training_code.clone(),
            personnel_id: record.personnel_id.clone(),
            record_id: record.record_id.clone(),
        }
    }
}

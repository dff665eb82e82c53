use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Document;

/// Status of a training record.
///
/// Completion only ever produces `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingStatus {
    Completed,
    Revoked,
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingStatus::Completed => f.write_str("Completed"),
            TrainingStatus::Revoked => f.write_str("Revoked"),
        }
    }
}

/// One completed-training event tying a person to a training code.
///
/// `completed_at` keeps the caller's RFC 3339 text verbatim; the same text is
/// embedded in the by-personnel index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub record_id: String,
    pub personnel_id: String,
    pub campus: String,
    pub training_code: String,
    pub completed_at: String,
    pub issued_by: String,
    pub status: TrainingStatus,
}

impl TrainingRecord {
    pub fn is_completed(&self) -> bool {
        self.status == TrainingStatus::Completed
    }

    /// Parse `completed_at` as an offset date-time.
    pub fn completed_at_time(&self) -> Result<DateTime<FixedOffset>, TimestampError> {
        parse_timestamp(&self.completed_at)
    }
}

/// Why a timestamp was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("{0}")]
    Layout(&'static str),

    #[error(transparent)]
    Parse(#[from] chrono::ParseError),
}

/// Parse an RFC 3339 date-time in its canonical layout: an uppercase `T`
/// between date and time, and either an uppercase `Z` or a `+hh:mm`/`-hh:mm`
/// offset.
///
/// The text is embedded verbatim in index keys. Layouts chrono alone would
/// also accept (a space or lowercase `t` separator, a lowercase `z`) are
/// rejected.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let bytes = text.as_bytes();
    if bytes.get(10) != Some(&b'T') {
        return Err(TimestampError::Layout(
            "date and time must be separated by an uppercase 'T'",
        ));
    }

    let zulu = bytes.last() == Some(&b'Z');
    let numeric = bytes.len() >= 6
        && matches!(bytes[bytes.len() - 6], b'+' | b'-')
        && bytes[bytes.len() - 3] == b':';
    if !zulu && !numeric {
        return Err(TimestampError::Layout(
            "offset must be an uppercase 'Z' or +hh:mm / -hh:mm",
        ));
    }

    Ok(DateTime::parse_from_rfc3339(text)?)
}

impl Document for TrainingRecord {
    const DOC_TYPE: &'static str = "training";

    fn id(&self) -> &str {
        &self.record_id
    }
}

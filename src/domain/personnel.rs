use std::fmt;

use serde::{Deserialize, Serialize};

use super::Document;

/// Rank held by a member of personnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Cadet,
}

/// Enrollment status of a member of personnel.
///
/// Enrollment only ever produces `Active`; other values can only arrive
/// through data written outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonnelStatus {
    Active,
    Inactive,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Cadet => f.write_str("Cadet"),
        }
    }
}

impl fmt::Display for PersonnelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonnelStatus::Active => f.write_str("Active"),
            PersonnelStatus::Inactive => f.write_str("Inactive"),
        }
    }
}

/// One enrolled individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personnel {
    pub personnel_id: String,
    pub name: String,
    pub rank: Rank,
    pub campus: String,
    pub status: PersonnelStatus,
}

impl Personnel {
    /// A freshly enrolled, active cadet.
    pub fn cadet(
        personnel_id: impl Into<String>,
        name: impl Into<String>,
        campus: impl Into<String>,
    ) -> Self {
        Self {
            personnel_id: personnel_id.into(),
            name: name.into(),
            rank: Rank::Cadet,
            campus: campus.into(),
            status: PersonnelStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PersonnelStatus::Active
    }
}

impl Document for Personnel {
    const DOC_TYPE: &'static str = "personnel";

    fn id(&self) -> &str {
        &self.personnel_id
    }
}

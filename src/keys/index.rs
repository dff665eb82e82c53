use super::{CompositeKey, KeyError};

/// A named secondary index with a fixed, ordered attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// Timeline index: all training for a person, ordered by completion time.
pub const TRAINING_BY_PERSONNEL: IndexDef = IndexDef {
    name: "training_byPersonnel",
    fields: &["personnelID", "completedAt", "recordID"],
};

/// Roster index: everyone who completed a training code.
pub const TRAINING_BY_CODE: IndexDef = IndexDef {
    name: "training_byCode",
    fields: &["trainingCode", "personnelID", "recordID"],
};

impl IndexDef {
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Full entry key. `values` must supply every field of the index.
    pub fn key(&self, values: &[&str]) -> Result<String, KeyError> {
        if values.len() != self.arity() {
            return Err(KeyError::Arity {
                index: self.name,
                expected: self.arity(),
                actual: values.len(),
            });
        }
        CompositeKey::new(self.name, values.iter().copied()).map(|k| k.encode())
    }

    /// Check that `values` can lead a scan of this index: at most one value
    /// per field. Supplying every field still works as a prefix.
    pub fn check_prefix(&self, values: &[&str]) -> Result<(), KeyError> {
        if values.len() > self.arity() {
            return Err(KeyError::Arity {
                index: self.name,
                expected: self.arity(),
                actual: values.len(),
            });
        }
        Ok(())
    }

    /// Decode an entry key of this index into its field values.
    pub fn decode(&self, key: &str) -> Result<Vec<String>, KeyError> {
        let composite = CompositeKey::decode(key)?;
        if composite.object_type() != self.name {
            return Err(KeyError::WrongIndex {
                expected: self.name,
                actual: composite.object_type().to_string(),
            });
        }
        if composite.attributes().len() != self.arity() {
            return Err(KeyError::Arity {
                index: self.name,
                expected: self.arity(),
                actual: composite.attributes().len(),
            });
        }
        Ok(composite.into_attributes())
    }
}

//! Key codec - primary keys and composite index keys.
//!
//! Primary records live at `"<doc_type>:<id>"`. Secondary index entries live
//! at composite keys in the host platform's format:
//!
//! ```text
//! U+0000 <object type> U+0000 <attr 1> U+0000 ... <attr n> U+0000
//! ```
//!
//! Because every attribute is terminated by the separator, a partial key
//! built from the first k attributes is an exact prefix of every full key
//! that starts with those attributes, so a prefix scan answers the query.

mod index;

use thiserror::Error;

pub use index::{IndexDef, TRAINING_BY_CODE, TRAINING_BY_PERSONNEL};

/// Separator between composite key components. Also opens every composite
/// key, which keeps composite keys out of the primary key space.
pub const COMPOSITE_KEY_SEPARATOR: char = '\u{0}';

/// Highest code point; reserved by the platform as a range-end sentinel.
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Error type for key encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key component {value:?} contains a reserved code point")]
    ReservedCharacter { value: String },

    #[error("composite key object type must not be empty")]
    EmptyObjectType,

    #[error("malformed composite key {key:?}: {reason}")]
    Malformed { key: String, reason: &'static str },

    #[error("composite key belongs to index {actual:?}, expected {expected:?}")]
    WrongIndex {
        expected: &'static str,
        actual: String,
    },

    #[error("index {index} expects {expected} attributes, got {actual}")]
    Arity {
        index: &'static str,
        expected: usize,
        actual: usize,
    },
}

fn validate_component(value: &str) -> Result<(), KeyError> {
    if value.contains(COMPOSITE_KEY_SEPARATOR) || value.contains(MAX_UNICODE_RUNE) {
        return Err(KeyError::ReservedCharacter {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Build the primary key `"<doc_type>:<id>"`.
pub fn state_key(doc_type: &str, id: &str) -> Result<String, KeyError> {
    validate_component(id)?;
    Ok(format!("{}:{}", doc_type, id))
}

/// A composite key: an object type (the index name) plus ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    object_type: String,
    attributes: Vec<String>,
}

impl CompositeKey {
    /// Create a composite key, rejecting components that contain a reserved
    /// code point.
    pub fn new<I, A>(object_type: impl Into<String>, attributes: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let object_type = object_type.into();
        if object_type.is_empty() {
            return Err(KeyError::EmptyObjectType);
        }
        validate_component(&object_type)?;

        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        for attr in &attributes {
            validate_component(attr)?;
        }

        Ok(Self {
            object_type,
            attributes,
        })
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn into_attributes(self) -> Vec<String> {
        self.attributes
    }

    /// Encode to the store key string.
    pub fn encode(&self) -> String {
        let len = 2
            + self.object_type.len()
            + self.attributes.iter().map(|a| a.len() + 1).sum::<usize>();
        let mut key = String::with_capacity(len);
        key.push(COMPOSITE_KEY_SEPARATOR);
        key.push_str(&self.object_type);
        key.push(COMPOSITE_KEY_SEPARATOR);
        for attr in &self.attributes {
            key.push_str(attr);
            key.push(COMPOSITE_KEY_SEPARATOR);
        }
        key
    }

    /// Split a store key back into object type and attributes.
    pub fn decode(key: &str) -> Result<Self, KeyError> {
        let malformed = |reason| KeyError::Malformed {
            key: key.to_string(),
            reason,
        };

        let body = key
            .strip_prefix(COMPOSITE_KEY_SEPARATOR)
            .ok_or_else(|| malformed("missing composite key namespace"))?
            .strip_suffix(COMPOSITE_KEY_SEPARATOR)
            .ok_or_else(|| malformed("missing trailing separator"))?;

        let mut parts = body.split(COMPOSITE_KEY_SEPARATOR);
        let object_type = match parts.next() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(malformed("empty object type")),
        };
        let attributes: Vec<String> = parts.map(str::to_string).collect();
        for attr in &attributes {
            if attr.contains(MAX_UNICODE_RUNE) {
                return Err(malformed("attribute contains a reserved code point"));
            }
        }

        Ok(Self {
            object_type,
            attributes,
        })
    }
}

/// Build the prefix that every composite key starting with `attributes`
/// under `object_type` shares. With no attributes this matches the whole
/// index.
pub fn partial_composite_key(object_type: &str, attributes: &[&str]) -> Result<String, KeyError> {
    CompositeKey::new(object_type, attributes.iter().copied()).map(|k| k.encode())
}

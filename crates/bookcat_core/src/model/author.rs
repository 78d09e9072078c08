//! Author entity.
//!
//! Authors are keyed by name and are shared between books. The author side
//! does not store its books; those are found by querying the book relation.

use super::validation::{require_non_blank, ValidationError};
use chrono::NaiveDate;

/// Persisted author record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Natural key.
    pub name: String,
    pub birth_date: NaiveDate,
}

impl Author {
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            birth_date,
        }
    }

    /// Checks field invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.name, ValidationError::BlankAuthorName)
    }
}

//! Publisher entity.

use super::validation::{require_non_blank, ValidationError};

/// Persisted publisher record, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Publisher {
    pub publisher_name: String,
}

impl Publisher {
    pub fn new(publisher_name: impl Into<String>) -> Self {
        Self {
            publisher_name: publisher_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.publisher_name, ValidationError::BlankPublisherName)
    }
}

//! Field validation shared by all catalog entities.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Digits and hyphens, optionally closed by an ISBN-10 `X` check character.
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9](?:[0-9-]*[0-9Xx])?$").expect("valid isbn regex"));

/// Validation failures for catalog entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// ISBN is empty after trim.
    BlankIsbn,
    /// ISBN contains characters other than digits, hyphens and a trailing `X`.
    MalformedIsbn(String),
    /// Book title is empty after trim.
    BlankTitle,
    /// Author name is empty after trim.
    BlankAuthorName,
    /// Publisher name is empty after trim.
    BlankPublisherName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankIsbn => write!(f, "isbn must not be blank"),
            Self::MalformedIsbn(value) => write!(f, "malformed isbn: `{value}`"),
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::BlankAuthorName => write!(f, "author name must not be blank"),
            Self::BlankPublisherName => write!(f, "publisher name must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    if isbn.trim().is_empty() {
        return Err(ValidationError::BlankIsbn);
    }
    if !ISBN_RE.is_match(isbn) {
        return Err(ValidationError::MalformedIsbn(isbn.to_string()));
    }
    Ok(())
}

pub(crate) fn require_non_blank(
    value: &str,
    error: ValidationError,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_isbn, ValidationError};

    #[test]
    fn isbn_accepts_hyphenated_and_check_character_forms() {
        assert!(validate_isbn("978-0").is_ok());
        assert!(validate_isbn("978-3-16-148410-0").is_ok());
        assert!(validate_isbn("0-306-40615-X").is_ok());
        assert!(validate_isbn("7").is_ok());
    }

    #[test]
    fn isbn_rejects_blank_and_foreign_characters() {
        assert_eq!(validate_isbn("   "), Err(ValidationError::BlankIsbn));
        assert_eq!(
            validate_isbn("978 0"),
            Err(ValidationError::MalformedIsbn("978 0".to_string()))
        );
        assert!(validate_isbn("-978").is_err());
        assert!(validate_isbn("978-").is_err());
        assert!(validate_isbn("X123").is_err());
    }
}

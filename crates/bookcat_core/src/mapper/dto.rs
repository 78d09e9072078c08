//! Transfer records returned by the catalog service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Flat author record. `birth_date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Flat book record.
///
/// Used both as `add_book` input and as lookup output. `publisher` carries
/// the publisher name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<AuthorDto>,
    pub publisher: String,
}

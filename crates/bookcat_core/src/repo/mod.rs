//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts used by the catalog service.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate entities before any SQL mutation.
//! - Lookups report misses as `Ok(None)`; deletes of missing keys report
//!   `RepoError::NotFound`.

pub mod author_repo;
pub mod book_repo;
pub mod publisher_repo;
pub mod transaction;

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies one catalog record by its natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Book(String),
    Author(String),
    Publisher(String),
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book(isbn) => write!(f, "book `{isbn}`"),
            Self::Author(name) => write!(f, "author `{name}`"),
            Self::Publisher(name) => write!(f, "publisher `{name}`"),
        }
    }
}

/// Generic repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(EntityKey),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of a find-or-create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    /// The record was already stored; the stored version is returned.
    Existing(T),
    /// The record was inserted by this call.
    Created(T),
}

impl<T> Resolved<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Existing(value) | Self::Created(value) => value,
        }
    }
}

//! Core catalog logic for books, authors and publishers.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mapper::dto::{AuthorDto, BookDto};
pub use mapper::{BookMapper, DefaultBookMapper};
pub use model::author::Author;
pub use model::book::{Book, Isbn};
pub use model::publisher::Publisher;
pub use model::validation::ValidationError;
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::publisher_repo::{PublisherRepository, SqlitePublisherRepository};
pub use repo::transaction::{SqliteTransactions, TransactionScope, TxMode};
pub use repo::{EntityKey, RepoError, RepoResult, Resolved};
pub use service::book_service::{
    AuthorRemovalPolicy, BookService, CatalogError, CatalogResult, SqliteBookService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

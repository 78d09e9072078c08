//! Runtime configuration for catalog hosts.
//!
//! # Responsibility
//! - Collect storage, logging and author-removal settings in one value.
//! - Load settings from serde sources or `BOOKCAT_*` environment variables.
//!
//! # Invariants
//! - Every field has a usable default; an empty environment yields an
//!   in-memory catalog without file logging.
//! - Invalid values are rejected at load time, never silently replaced.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level};
use crate::service::book_service::{AuthorRemovalPolicy, SqliteBookService};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "BOOKCAT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "BOOKCAT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKCAT_LOG_DIR";
pub const ENV_AUTHOR_REMOVAL: &str = "BOOKCAT_AUTHOR_REMOVAL";

/// Configuration loading failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Catalog host settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite file. `None` keeps the catalog in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling logs. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub author_removal: AuthorRemovalPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            author_removal: AuthorRemovalPolicy::default(),
        }
    }
}

impl CatalogConfig {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(policy) = read(ENV_AUTHOR_REMOVAL) {
            config.author_removal = policy
                .parse()
                .map_err(|message| ConfigError::InvalidValue {
                    key: ENV_AUTHOR_REMOVAL,
                    message,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(|message| ConfigError::InvalidValue {
            key: ENV_LOG_LEVEL,
            message,
        })?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }
        Ok(())
    }

    /// Returns whether the catalog lives only as long as its connection.
    pub fn is_in_memory(&self) -> bool {
        self.db_path.is_none()
    }

    /// Opens the configured database with migrations applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when file logging is disabled.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", dir.display()))?;
        init_logging(&self.log_level, dir)?;
        Ok(true)
    }

    /// Builds the catalog service over `conn` with the configured policy.
    pub fn book_service<'conn>(&self, conn: &'conn Connection) -> SqliteBookService<'conn> {
        SqliteBookService::sqlite(conn).with_author_removal(self.author_removal)
    }
}

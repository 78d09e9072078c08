//! Catalog schema migrations.
//!
//! # Responsibility
//! - Register catalog schema steps in strictly increasing order.
//! - Bring a connection up to the latest step in one transaction.
//! - Confirm the catalog tables exist before the connection is handed out.
//!
//! # Invariants
//! - Step versions are monotonic and mirrored to `PRAGMA user_version`.
//! - A connection whose version claims the latest step but lacks a catalog
//!   table is rejected, not repaired.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// Tables every migrated catalog must contain.
pub const CATALOG_TABLES: [&str; 4] = ["publishers", "authors", "books", "book_authors"];

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "catalog_tables",
        sql: include_str!("0001_catalog.sql"),
    },
    SchemaStep {
        version: 2,
        name: "relation_indexes",
        sql: include_str!("0002_relation_indexes.sql"),
    },
];

/// Returns the newest catalog schema version this build understands.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Migrates the catalog schema and checks the resulting table set.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    if from_version < latest {
        let tx = conn.transaction()?;
        for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
            tx.execute_batch(step.sql)?;
            tx.pragma_update(None, "user_version", step.version)?;
            debug!(
                "event=db_migrate_step module=db status=ok version={} step={}",
                step.version, step.name
            );
        }
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={}",
            from_version, latest
        );
    }

    verify_catalog_tables(conn)
}

fn verify_catalog_tables(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
    )?;
    for table in CATALOG_TABLES {
        let exists: i64 = stmt.query_row([table], |row| row.get(0))?;
        if exists != 1 {
            return Err(DbError::MissingCatalogTable(table));
        }
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

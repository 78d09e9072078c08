//! Transaction boundaries over a shared SQLite connection.
//!
//! # Responsibility
//! - Run one unit of work atomically: commit on `Ok`, roll back on `Err`.
//! - Let repositories and services share one boundary on one connection.
//!
//! # Invariants
//! - A scope opened while another transaction is active joins it; the outer
//!   owner decides commit or rollback.
//! - A unit of work that returns early or panics is rolled back when the
//!   `rusqlite::Transaction` drops.

use super::RepoError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Locking mode for a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Deferred transaction; lookups see one consistent snapshot.
    Read,
    /// Immediate transaction; takes the write lock up front.
    Write,
}

impl TxMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Read => TransactionBehavior::Deferred,
            Self::Write => TransactionBehavior::Immediate,
        }
    }
}

/// Transaction manager contract consumed by services.
pub trait TransactionScope {
    /// Runs `op` inside a transaction of the requested mode.
    fn run<T, E, F>(&self, mode: TxMode, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed transaction manager.
#[derive(Clone, Copy)]
pub struct SqliteTransactions<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTransactions<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TransactionScope for SqliteTransactions<'_> {
    fn run<T, E, F>(&self, mode: TxMode, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        within(self.conn, mode, op)
    }
}

pub(crate) fn within<T, E, F>(conn: &Connection, mode: TxMode, op: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<RepoError>,
{
    if !conn.is_autocommit() {
        return op();
    }

    let tx = Transaction::new_unchecked(conn, mode.behavior())
        .map_err(|err| E::from(RepoError::from(err)))?;
    let value = op()?;
    tx.commit().map_err(|err| E::from(RepoError::from(err)))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{within, SqliteTransactions, TransactionScope, TxMode};
    use crate::repo::{RepoError, RepoResult};
    use rusqlite::Connection;
    use std::panic::{self, AssertUnwindSafe};

    fn scratch_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL);")
            .unwrap();
        conn
    }

    fn row_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn commit_on_ok_and_rollback_on_err() {
        let conn = scratch_conn();
        let tx = SqliteTransactions::new(&conn);

        tx.run(TxMode::Write, || -> RepoResult<()> {
            conn.execute("INSERT INTO t (v) VALUES (1);", [])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(row_count(&conn), 1);

        let result = tx.run(TxMode::Write, || -> RepoResult<()> {
            conn.execute("INSERT INTO t (v) VALUES (2);", [])?;
            Err(RepoError::InvalidData("forced".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(row_count(&conn), 1);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn read_scope_holds_transaction_open_until_op_returns() {
        let conn = scratch_conn();
        let tx = SqliteTransactions::new(&conn);

        let inside_autocommit = tx
            .run(TxMode::Read, || -> RepoResult<bool> { Ok(conn.is_autocommit()) })
            .unwrap();
        assert!(!inside_autocommit);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn panicking_op_is_rolled_back() {
        let conn = scratch_conn();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = within(&conn, TxMode::Write, || -> RepoResult<()> {
                conn.execute("INSERT INTO t (v) VALUES (1);", [])?;
                panic!("unit of work aborted");
            });
        }));

        assert!(outcome.is_err());
        assert!(conn.is_autocommit());
        assert_eq!(row_count(&conn), 0);
    }

    #[test]
    fn nested_scope_joins_outer_transaction() {
        let conn = scratch_conn();

        let result = within(&conn, TxMode::Write, || -> RepoResult<()> {
            within(&conn, TxMode::Write, || -> RepoResult<()> {
                conn.execute("INSERT INTO t (v) VALUES (1);", [])?;
                Ok(())
            })?;
            assert!(!conn.is_autocommit());
            Err(RepoError::InvalidData("outer failure".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(row_count(&conn), 0);
    }
}

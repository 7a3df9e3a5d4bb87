//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::row_helpers::row_as_strings;
use crate::traits::Database;
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

const DEFAULT_SCHEMA: &str = "main";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    schema: String,
    in_transaction: AtomicBool,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::with_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            schema: DEFAULT_SCHEMA.to_string(),
            in_transaction: AtomicBool::new(false),
        }
    }

    /// Use `schema` for table lookups instead of `main`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Whether a transaction opened through [`Database::start_transaction`] is pending.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::SeqCst)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

impl Database for DuckDbBackend {
    fn execute(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter().copied()))
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn query_row(&self, sql: &str, params: &[&str]) -> DbResult<Option<Vec<String>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        let mut rows = stmt.query(params_from_iter(params.iter().copied()))?;
        let first = rows.next()?.map(|row| row_as_strings(row));
        Ok(first)
    }

    fn start_transaction(&self) -> DbResult<()> {
        if self.in_transaction() {
            return Err(DbError::TransactionAlreadyOpen);
        }
        let conn = self.lock()?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::ExecutionError(format!("BEGIN failed: {e}")))?;
        self.in_transaction.store(true, Ordering::SeqCst);
        log::debug!("Transaction opened");
        Ok(())
    }

    fn commit(&self) -> DbResult<()> {
        if !self.in_transaction() {
            return Err(DbError::NoTransaction {
                operation: "commit",
            });
        }
        let conn = self.lock()?;
        conn.execute_batch("COMMIT")
            .map_err(|e| DbError::ExecutionError(format!("COMMIT failed: {e}")))?;
        self.in_transaction.store(false, Ordering::SeqCst);
        log::debug!("Transaction committed");
        Ok(())
    }

    fn rollback(&self) -> DbResult<()> {
        if !self.in_transaction() {
            return Err(DbError::NoTransaction {
                operation: "roll back",
            });
        }
        let conn = self.lock()?;
        // A failed ROLLBACK still ends the transaction on the DuckDB side.
        self.in_transaction.store(false, Ordering::SeqCst);
        conn.execute_batch("ROLLBACK")
            .map_err(|e| DbError::ExecutionError(format!("ROLLBACK failed: {e}")))?;
        log::debug!("Transaction rolled back");
        Ok(())
    }

    fn database_name(&self) -> &str {
        &self.schema
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

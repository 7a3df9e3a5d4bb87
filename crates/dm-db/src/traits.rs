//! Capability traits the migration engine depends on

use crate::error::DbResult;
use dm_core::MigrationRecord;

/// Database abstraction trait for dbmigrator
///
/// Implementations own the connection and at most one open transaction.
/// All statements issued between `start_transaction` and `commit`/`rollback`
/// run inside that transaction.
pub trait Database: Send + Sync {
    /// Execute one SQL statement with positional `?` parameters, returns affected rows
    fn execute(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Execute multiple SQL statements without parameters
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return its first row with every column rendered as text.
    /// `None` when the query yields no rows.
    fn query_row(&self, sql: &str, params: &[&str]) -> DbResult<Option<Vec<String>>>;

    /// Open a transaction. Fails if one is already open.
    fn start_transaction(&self) -> DbResult<()>;

    /// Commit the open transaction. Fails if none is open.
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction. Fails if none is open.
    fn rollback(&self) -> DbResult<()>;

    /// Schema the version-tracking table lives in
    fn database_name(&self) -> &str;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Storage for the applied-version history.
pub trait MigrationsRepository: Send + Sync {
    /// Append a row recording `version` as the latest applied version
    fn insert(&self, version: &str) -> DbResult<()>;

    /// Most recently inserted row, if any
    fn get_latest(&self) -> DbResult<Option<MigrationRecord>>;

    /// Whether the version-tracking table exists
    fn does_exist(&self) -> DbResult<bool>;

    /// Create the version-tracking table
    fn create_table(&self) -> DbResult<()>;

    /// Name of the version-tracking table
    fn table_name(&self) -> &str;
}

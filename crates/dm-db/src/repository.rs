//! SQL-backed version-tracking table
//!
//! One row is appended per completed migration run. Rows are never updated,
//! and the latest row is the one with the highest id.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, MigrationsRepository};
use chrono::{DateTime, Utc};
use dm_core::MigrationRecord;
use std::sync::Arc;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// [`MigrationsRepository`] storing its rows in a table of the target database.
pub struct SqlMigrationsRepository {
    table_name: String,
    db: Arc<dyn Database>,
}

impl SqlMigrationsRepository {
    pub fn new(db: Arc<dyn Database>, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            db,
        }
    }

    /// Split an optionally schema-qualified table name, falling back to the
    /// database's own schema.
    fn schema_and_table(&self) -> (&str, &str) {
        match self.table_name.rfind('.') {
            Some(pos) => (&self.table_name[..pos], &self.table_name[pos + 1..]),
            None => (self.db.database_name(), &self.table_name),
        }
    }
}

impl MigrationsRepository for SqlMigrationsRepository {
    fn insert(&self, version: &str) -> DbResult<()> {
        let created_at = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let sql = format!(
            "INSERT INTO {table} (id, version, created_at) \
             SELECT COALESCE(MAX(id), 0) + 1, ?, CAST(? AS TIMESTAMP) FROM {table}",
            table = self.table_name
        );
        self.db.execute(&sql, &[version, created_at.as_str()])?;
        log::debug!("Recorded version {} in {}", version, self.table_name);
        Ok(())
    }

    fn get_latest(&self) -> DbResult<Option<MigrationRecord>> {
        let sql = format!(
            "SELECT id, version, epoch_ms(created_at) FROM {} ORDER BY id DESC LIMIT 1",
            self.table_name
        );
        self.db
            .query_row(&sql, &[])?
            .map(|row| record_from_row(&row))
            .transpose()
    }

    fn does_exist(&self) -> DbResult<bool> {
        let (schema, table) = self.schema_and_table();
        let row = self.db.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            &[schema, table],
        )?;
        let count = match row.as_deref() {
            Some([count, ..]) => parse_column::<i64>(count, "count")?,
            _ => 0,
        };
        Ok(count > 0)
    }

    fn create_table(&self) -> DbResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id         INTEGER NOT NULL,
                 version    VARCHAR NOT NULL,
                 created_at TIMESTAMP NOT NULL
             )",
            self.table_name
        );
        self.db.execute_batch(&sql)?;
        log::debug!("Created migrations table {}", self.table_name);
        Ok(())
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn record_from_row(row: &[String]) -> DbResult<MigrationRecord> {
    let [id, version, created_at] = row else {
        return Err(DbError::ExecutionError(format!(
            "expected 3 columns in migrations row, got {}",
            row.len()
        )));
    };

    let millis = parse_column::<i64>(created_at, "created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        DbError::ExecutionError(format!("created_at out of range: {millis}"))
    })?;

    Ok(MigrationRecord {
        id: parse_column(id, "id")?,
        version: version.clone(),
        created_at,
    })
}

fn parse_column<T: std::str::FromStr>(value: &str, column: &str) -> DbResult<T> {
    value
        .parse()
        .map_err(|_| DbError::ExecutionError(format!("unexpected {column} value '{value}'")))
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;

//! In-memory fakes for the database, repository and logger capabilities.

use crate::logger::MigrationLogger;
use chrono::Utc;
use dm_core::MigrationRecord;
use dm_db::{Database, DbError, DbResult, MigrationsRepository};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeDbState {
    pub events: Vec<String>,
    pub applied: Vec<String>,
    pub pending: Option<Vec<String>>,
}

/// Records every call. Statements run inside a transaction only become
/// `applied` on commit.
#[derive(Default)]
pub(crate) struct FakeDatabase {
    pub state: Mutex<FakeDbState>,
    /// Any statement containing this text fails
    pub fail_on: Option<String>,
    pub fail_begin: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
}

impl FakeDatabase {
    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn applied(&self) -> Vec<String> {
        self.state.lock().unwrap().applied.clone()
    }
}

impl Database for FakeDatabase {
    fn execute(&self, sql: &str, _params: &[&str]) -> DbResult<usize> {
        self.execute_batch(sql).map(|_| 1)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(format!("exec {sql}"));
        if self.fail_on.as_deref().is_some_and(|f| sql.contains(f)) {
            return Err(DbError::ExecutionError(format!("boom: {sql}")));
        }
        match state.pending.as_mut() {
            Some(pending) => pending.push(sql.to_string()),
            None => state.applied.push(sql.to_string()),
        }
        Ok(())
    }

    fn query_row(&self, _sql: &str, _params: &[&str]) -> DbResult<Option<Vec<String>>> {
        Ok(None)
    }

    fn start_transaction(&self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("begin".to_string());
        if self.fail_begin {
            return Err(DbError::ExecutionError("begin refused".to_string()));
        }
        if state.pending.is_some() {
            return Err(DbError::TransactionAlreadyOpen);
        }
        state.pending = Some(Vec::new());
        Ok(())
    }

    fn commit(&self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("commit".to_string());
        if self.fail_commit {
            return Err(DbError::ExecutionError("commit refused".to_string()));
        }
        let pending = state.pending.take().ok_or(DbError::NoTransaction {
            operation: "commit",
        })?;
        state.applied.extend(pending);
        Ok(())
    }

    fn rollback(&self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("rollback".to_string());
        state.pending.take().ok_or(DbError::NoTransaction {
            operation: "roll back",
        })?;
        if self.fail_rollback {
            return Err(DbError::ExecutionError("rollback refused".to_string()));
        }
        Ok(())
    }

    fn database_name(&self) -> &str {
        "main"
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}

#[derive(Default)]
pub(crate) struct FakeRepository {
    pub exists: Mutex<bool>,
    pub versions: Mutex<Vec<String>>,
    pub fail_create: bool,
    pub fail_insert: bool,
}

impl FakeRepository {
    /// Repository whose table exists and already records `versions`.
    pub fn with_history(versions: &[&str]) -> Self {
        Self {
            exists: Mutex::new(true),
            versions: Mutex::new(versions.iter().map(|v| v.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn versions(&self) -> Vec<String> {
        self.versions.lock().unwrap().clone()
    }
}

impl MigrationsRepository for FakeRepository {
    fn insert(&self, version: &str) -> DbResult<()> {
        if self.fail_insert {
            return Err(DbError::ExecutionError("insert refused".to_string()));
        }
        self.versions.lock().unwrap().push(version.to_string());
        Ok(())
    }

    fn get_latest(&self) -> DbResult<Option<MigrationRecord>> {
        let versions = self.versions.lock().unwrap();
        Ok(versions.last().map(|version| MigrationRecord {
            id: versions.len() as i64,
            version: version.clone(),
            created_at: Utc::now(),
        }))
    }

    fn does_exist(&self) -> DbResult<bool> {
        Ok(*self.exists.lock().unwrap())
    }

    fn create_table(&self) -> DbResult<()> {
        if self.fail_create {
            return Err(DbError::ExecutionError("create refused".to_string()));
        }
        *self.exists.lock().unwrap() = true;
        Ok(())
    }

    fn table_name(&self) -> &str {
        "__migrations__"
    }
}

#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }
}

impl MigrationLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

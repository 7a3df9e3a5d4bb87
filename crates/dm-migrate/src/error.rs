//! Error types for dm-migrate

use dm_core::{CoreError, Version};
use dm_db::DbError;
use thiserror::Error;

/// Migration errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// No migration script configured (M001)
    #[error("[M001] No migrations file path configured")]
    NoFilePath,

    /// Migration script could not be read (M002)
    #[error("[M002] Failed to read migrations file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Migration script is malformed (M003)
    #[error("[M003] Failed to parse migrations file: {0}")]
    Parse(#[from] CoreError),

    /// Version-tracking table holds text that is not a version (M004)
    #[error("[M004] Stored version '{stored}' is not a valid version")]
    InvalidStoredVersion { stored: String },

    /// Nothing to run for the requested direction and target (M005)
    #[error("[M005] Nothing to run: database is at {current}, direction {direction}")]
    NothingToRun {
        current: Version,
        direction: dm_core::Direction,
    },

    /// A statement or the version update failed (M006)
    #[error("[M006] Migration failed while {context}: {source}")]
    ExecutionFailure {
        context: String,
        #[source]
        source: DbError,
    },

    /// Begin, commit or rollback failed (M007)
    #[error("[M007] Transaction {operation} failed: {source}")]
    TransactionFailure {
        operation: &'static str,
        #[source]
        source: DbError,
    },

    /// Version-tracking table could not be checked or created (M008)
    #[error("[M008] Failed to set up migrations table '{table}': {source}")]
    TableSetup {
        table: String,
        #[source]
        source: DbError,
    },
}

impl MigrateError {
    /// True for the expected no-op outcome.
    pub fn is_nothing_to_run(&self) -> bool {
        matches!(self, MigrateError::NothingToRun { .. })
    }
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

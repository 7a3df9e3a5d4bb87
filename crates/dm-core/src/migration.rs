//! Stored migration records.

use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the version-tracking table, written once per successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Row id, increasing with every run
    pub id: i64,

    /// Version text as persisted (`major.minor.patch`)
    pub version: String,

    /// When the run completed
    pub created_at: DateTime<Utc>,
}

impl MigrationRecord {
    /// Parse the stored version text. `None` means the row was corrupted.
    pub fn parsed_version(&self) -> Option<Version> {
        Version::parse(&self.version)
    }
}

//! dm-migrate - Migration engine for dbmigrator
//!
//! Wires the script parser, the statement selector and the database
//! capabilities into one `process` call that moves a database from its
//! recorded version to the requested one.

pub mod engine;
pub mod error;
pub mod logger;
pub mod runner;

pub use engine::{
    Engine, EngineOptions, EngineState, MigrationOutcome, MigrationPlan, MigrationStatus,
};
pub use error::{MigrateError, MigrateResult};
pub use logger::{LogLogger, MigrationLogger};
pub use runner::{run_statements, RunSummary};

#[cfg(test)]
pub(crate) mod test_support;

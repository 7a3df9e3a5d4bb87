//! dm-core - Core library for dbmigrator
//!
//! This crate provides the version type, the migration script parser, the
//! statement selector, the stored migration record and configuration
//! loading used across all dbmigrator components.

pub mod config;
pub mod error;
pub mod migration;
pub mod parser;
pub mod selector;
pub(crate) mod serde_helpers;
pub mod statement;
pub mod version;

pub use config::{Config, DatabaseConfig, Driver};
pub use error::{CoreError, CoreResult};
pub use migration::MigrationRecord;
pub use parser::{parse_lines, parse_script, ScriptParser};
pub use selector::{filter_statements, latest_version, previous_version, resolve_direction};
pub use statement::{Direction, Statement};
pub use version::Version;

//! dm-db - Database layer for dbmigrator
//!
//! This crate provides the `Database` and `MigrationsRepository` capability
//! traits, the DuckDB implementation of `Database`, and the SQL-backed
//! version-tracking repository.

pub mod duckdb;
pub mod error;
pub mod repository;
pub(crate) mod row_helpers;
pub mod traits;

pub use self::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use repository::SqlMigrationsRepository;
pub use traits::{Database, MigrationsRepository};

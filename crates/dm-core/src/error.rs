//! Error types for dm-core

use thiserror::Error;

/// Core error type for dbmigrator
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Malformed or missing version tag in a migration script
    #[error("[C001] Bad versioning on line {line_number}: '{line}'. Versions must follow the `#vX.Y.Z` format")]
    BadVersioning { line_number: usize, line: String },

    /// C002: Text that does not describe a version
    #[error("[C002] Invalid version '{input}'")]
    InvalidVersion { input: String },

    /// C003: Configuration file not found
    #[error("[C003] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C004: Failed to parse configuration file
    #[error("[C004] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C005: Invalid configuration value
    #[error("[C005] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C006: Config file with an extension we cannot read
    #[error("[C006] Unsupported config format for {path}: expected .json, .yml or .yaml")]
    UnsupportedConfigFormat { path: String },

    /// C007: IO error with file path context
    #[error("[C007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C008: Unknown migration direction
    #[error("[C008] Invalid direction '{input}': expected 'up' or 'down'")]
    InvalidDirection { input: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

//! Configuration types and loading for dbmigrator
//!
//! Configuration comes either from a file (`dm.json`, `dm.yml` or `dm.yaml`)
//! or from `DM_*` environment variables.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use crate::statement::Direction;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["dm.json", "dm.yml", "dm.yaml"];

/// Default name of the version-tracking table.
pub const DEFAULT_MIGRATIONS_TABLE_NAME: &str = "__migrations__";

const DEFAULT_DB_PATH: &str = ":memory:";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table recording the applied version after every run
    #[serde(default = "default_migrations_table_name")]
    pub migrations_table_name: String,

    /// Path of the migration script
    #[serde(default)]
    pub migrations_file_path: Option<String>,

    /// Wrap each run in a single transaction
    #[serde(default = "default_true")]
    pub with_transaction: bool,

    /// Direction used by a plain `process` call
    #[serde(default)]
    pub direction: Direction,

    /// Version the database should end up at
    #[serde(default)]
    pub target_version: Option<Version>,
}

/// Database driver selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Driver::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl std::str::FromStr for Driver {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Driver::DuckDb),
            other => Err(CoreError::ConfigInvalid {
                message: format!("Unknown database driver '{other}'"),
            }),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database driver
    #[serde(default)]
    pub driver: Driver,

    /// Database path (file path or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Logical database name, used to scope table lookups
    #[serde(default = "default_db_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            path: default_db_path(),
            name: default_db_name(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            migrations_table_name: default_migrations_table_name(),
            migrations_file_path: None,
            with_transaction: true,
            direction: Direction::default(),
            target_version: None,
        }
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_db_name() -> String {
    "main".to_string()
}

fn default_migrations_table_name() -> String {
    DEFAULT_MIGRATIONS_TABLE_NAME.to_string()
}

/// Environment variables read by [`Config::from_env`].
pub mod env {
    pub const DATABASE_PATH: &str = "DM_DATABASE_PATH";
    pub const DATABASE_NAME: &str = "DM_DATABASE_NAME";
    pub const DRIVER: &str = "DM_DRIVER";
    pub const MIGRATIONS_TABLE_NAME: &str = "DM_MIGRATIONS_TABLE_NAME";
    pub const MIGRATIONS_FILE_PATH: &str = "DM_MIGRATIONS_FILE_PATH";
    pub const WITH_TRANSACTION: &str = "DM_WITH_TRANSACTION";
    pub const DIRECTION: &str = "DM_DIRECTION";
    pub const TARGET_VERSION: &str = "DM_TARGET_VERSION";
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// The format follows the extension: `.json`, `.yml` or `.yaml`.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let parse_error = |message: String| CoreError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config: Config = match extension.as_deref() {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            Some("yml") | Some("yaml") => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            _ => {
                return Err(CoreError::UnsupportedConfigFormat {
                    path: path.display().to_string(),
                })
            }
        };

        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a directory, probing [`CONFIG_FILE_NAMES`].
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Build configuration from `DM_*` environment variables.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup. Unset or empty variables
    /// keep their defaults.
    pub fn from_env_with<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(path) = get(env::DATABASE_PATH) {
            config.database.path = path;
        }
        if let Some(name) = get(env::DATABASE_NAME) {
            config.database.name = name;
        }
        if let Some(driver) = get(env::DRIVER) {
            config.database.driver = driver.parse()?;
        }
        if let Some(table) = get(env::MIGRATIONS_TABLE_NAME) {
            config.migrations_table_name = table;
        }
        if let Some(path) = get(env::MIGRATIONS_FILE_PATH) {
            config.migrations_file_path = Some(path);
        }
        if let Some(flag) = get(env::WITH_TRANSACTION) {
            config.with_transaction = parse_bool(env::WITH_TRANSACTION, &flag)?;
        }
        if let Some(direction) = get(env::DIRECTION) {
            config.direction = direction.parse()?;
        }
        if let Some(target) = get(env::TARGET_VERSION) {
            config.target_version = Some(target.parse()?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let table = self.migrations_table_name.trim();
        if table.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_table_name cannot be empty".to_string(),
            });
        }

        if !table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "migrations_table_name '{}' may only contain letters, digits, '_' and '.'",
                    table
                ),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Migration script path, if configured.
    pub fn migrations_file(&self) -> Option<PathBuf> {
        self.migrations_file_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

fn parse_bool(key: &str, value: &str) -> CoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoreError::ConfigInvalid {
            message: format!("{key} must be a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

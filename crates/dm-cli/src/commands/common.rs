//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dm_core::config::CONFIG_FILE_NAMES;
use dm_core::{Config, Driver};
use dm_db::{Database, DuckDbBackend, SqlMigrationsRepository};
use dm_migrate::{Engine, EngineOptions};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Resolve configuration: `--config`, then a config file in the project
/// directory, then `DM_*` environment variables.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => {
            let dir = Path::new(&global.project_dir);
            if CONFIG_FILE_NAMES.iter().any(|name| dir.join(name).exists()) {
                Config::load_from_dir(dir)
                    .with_context(|| format!("Failed to load config from {}", dir.display()))?
            } else {
                log::debug!(
                    "No config file in {}, reading DM_* environment variables",
                    dir.display()
                );
                Config::from_env().context("Failed to read config from environment")?
            }
        }
    };

    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    Ok(config)
}

/// Apply per-command overrides on top of the loaded config.
pub(crate) fn apply_overrides(
    config: &mut Config,
    file: Option<&str>,
    with_transaction: Option<bool>,
) {
    if let Some(file) = file {
        config.migrations_file_path = Some(file.to_string());
    }
    if let Some(with_transaction) = with_transaction {
        config.with_transaction = with_transaction;
    }
}

/// Open the configured database and wire up an engine over it.
pub(crate) fn build_engine(config: &Config) -> Result<Engine> {
    let db: Arc<dyn Database> = match config.database.driver {
        Driver::DuckDb => Arc::new(
            DuckDbBackend::new(&config.database.path)
                .with_context(|| format!("Failed to open database {}", config.database.path))?
                .with_schema(config.database.name.clone()),
        ),
    };
    log::debug!(
        "Opened {} database at {}",
        db.db_type(),
        config.database.path
    );

    let repository = Arc::new(SqlMigrationsRepository::new(
        Arc::clone(&db),
        config.migrations_table_name.clone(),
    ));
    Ok(Engine::with_log_logger(
        EngineOptions::from(config),
        db,
        repository,
    ))
}

//! Migration engine
//!
//! A run goes through these steps, each recorded as an [`EngineState`]:
//!
//! 1. make sure the version-tracking table exists
//! 2. read and parse the migration script
//! 3. resolve the current version from the latest stored row
//! 4. pick the statements to run for the direction and target
//! 5. run them, inside one transaction unless disabled
//! 6. record the new version and commit
//!
//! Any failure after the transaction is opened rolls it back.

use crate::error::{MigrateError, MigrateResult};
use crate::logger::{LogLogger, MigrationLogger};
use crate::runner::{run_statements, RunSummary};
use dm_core::{
    filter_statements, latest_version, parse_script, previous_version, resolve_direction, Config,
    Direction, Statement, Version,
};
use dm_db::{Database, DbError, MigrationsRepository};
use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the engine currently is in a run.
///
/// `Done` is only reached by a run that returned `Ok`. Every `Err`,
/// including [`MigrateError::NothingToRun`], leaves the engine in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    NotStarted,
    TableChecked,
    Parsed,
    VersionResolved,
    Filtered,
    Executing,
    VersionPersisted,
    Done,
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::NotStarted => "not_started",
            EngineState::TableChecked => "table_checked",
            EngineState::Parsed => "parsed",
            EngineState::VersionResolved => "version_resolved",
            EngineState::Filtered => "filtered",
            EngineState::Executing => "executing",
            EngineState::VersionPersisted => "version_persisted",
            EngineState::Done => "done",
            EngineState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Run settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub migrations_file_path: Option<PathBuf>,
    pub with_transaction: bool,
    pub direction: Direction,
    pub target_version: Option<Version>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            migrations_file_path: config.migrations_file(),
            with_transaction: config.with_transaction,
            direction: config.direction,
            target_version: config.target_version,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    pub from: Version,
    pub to: Version,
    pub direction: Direction,
    pub summary: RunSummary,
}

/// What a run would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub current: Version,
    pub direction: Direction,
    pub target: Option<Version>,
    pub statements: Vec<Statement>,
    /// Version that would be recorded; equals `current` when nothing would run
    pub next_version: Version,
}

impl MigrationPlan {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Recorded version against what the script offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub current: Version,
    pub latest_available: Version,
    pub pending_up: usize,
}

/// Everything steps 1-4 produce.
struct Selection {
    current: Version,
    direction: Direction,
    all: Vec<Statement>,
    selected: Vec<Statement>,
}

/// Drives parsing, selection, execution and version bookkeeping.
pub struct Engine {
    options: EngineOptions,
    db: Arc<dyn Database>,
    repository: Arc<dyn MigrationsRepository>,
    logger: Arc<dyn MigrationLogger>,
    state: Cell<EngineState>,
}

impl Engine {
    pub fn new(
        options: EngineOptions,
        db: Arc<dyn Database>,
        repository: Arc<dyn MigrationsRepository>,
        logger: Arc<dyn MigrationLogger>,
    ) -> Self {
        Self {
            options,
            db,
            repository,
            logger,
            state: Cell::new(EngineState::NotStarted),
        }
    }

    /// Engine reporting through the `log` facade.
    pub fn with_log_logger(
        options: EngineOptions,
        db: Arc<dyn Database>,
        repository: Arc<dyn MigrationsRepository>,
    ) -> Self {
        Self::new(options, db, repository, Arc::new(LogLogger))
    }

    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Migrate using the configured direction and target.
    pub fn process(&self) -> MigrateResult<MigrationOutcome> {
        self.process_with(self.options.direction, self.options.target_version)
    }

    /// Apply everything above the current version, or up to the configured target.
    pub fn process_up(&self) -> MigrateResult<MigrationOutcome> {
        self.process_with(Direction::Up, self.options.target_version)
    }

    /// Undo the current version, or down to the configured target.
    pub fn process_down(&self) -> MigrateResult<MigrationOutcome> {
        self.process_with(Direction::Down, self.options.target_version)
    }

    /// Move to `target`, up or down depending on where the database is.
    pub fn process_to(&self, target: Version) -> MigrateResult<MigrationOutcome> {
        self.process_with(Direction::Up, Some(target))
    }

    pub fn process_with(
        &self,
        direction: Direction,
        target: Option<Version>,
    ) -> MigrateResult<MigrationOutcome> {
        self.transition(EngineState::NotStarted);
        let result = self.run(direction, target);
        match &result {
            Ok(_) => {}
            Err(e) if e.is_nothing_to_run() => self.transition(EngineState::Failed),
            Err(e) => {
                self.logger.error(&e.to_string());
                self.transition(EngineState::Failed);
            }
        }
        result
    }

    /// Dry run with the configured direction and target.
    pub fn plan(&self) -> MigrateResult<MigrationPlan> {
        self.plan_with(self.options.direction, self.options.target_version)
    }

    /// Report what `process_with` would run. An empty plan is not an error.
    /// A missing tracking table reads as `0.0.0` and is left uncreated.
    pub fn plan_with(
        &self,
        direction: Direction,
        target: Option<Version>,
    ) -> MigrateResult<MigrationPlan> {
        self.transition(EngineState::NotStarted);
        let selection = self.select(direction, target, false).inspect_err(|_| {
            self.transition(EngineState::Failed);
        })?;

        let next_version = if selection.selected.is_empty() {
            selection.current
        } else {
            next_version(
                &selection.current,
                selection.direction,
                target,
                &selection.all,
            )
        };

        Ok(MigrationPlan {
            current: selection.current,
            direction: selection.direction,
            target,
            statements: selection.selected,
            next_version,
        })
    }

    /// Current recorded version, latest version in the script and the
    /// number of `Up` statements not yet applied. Never writes to the database.
    pub fn status(&self) -> MigrateResult<MigrationStatus> {
        self.transition(EngineState::NotStarted);
        let gather = || -> MigrateResult<(Vec<Statement>, Version)> {
            let tracked = self.check_table(false)?;
            let all = self.read_statements()?;
            Ok((all, self.current_version(tracked)?))
        };
        let (all, current) = gather().inspect_err(|_| self.transition(EngineState::Failed))?;

        Ok(MigrationStatus {
            current,
            latest_available: latest_version(&all),
            pending_up: filter_statements(&current, &all, Direction::Up, None).len(),
        })
    }

    fn run(&self, direction: Direction, target: Option<Version>) -> MigrateResult<MigrationOutcome> {
        let selection = self.select(direction, target, true)?;
        if selection.selected.is_empty() {
            self.logger.info(&format!(
                "Nothing to run: database is at {} ({})",
                selection.current, selection.direction
            ));
            return Err(MigrateError::NothingToRun {
                current: selection.current,
                direction: selection.direction,
            });
        }

        let Selection {
            current,
            direction,
            all,
            selected,
        } = selection;
        let transactional = self.options.with_transaction;

        self.transition(EngineState::Executing);
        if transactional {
            self.db
                .start_transaction()
                .map_err(|source| MigrateError::TransactionFailure {
                    operation: "begin",
                    source,
                })?;
        }

        let summary = run_statements(
            self.db.as_ref(),
            &selected,
            transactional,
            self.logger.as_ref(),
        )
        .map_err(|e| self.abort(e))?;

        let next = next_version(&current, direction, target, &all);
        self.repository
            .insert(&next.to_string())
            .map_err(|source| {
                self.abort(MigrateError::ExecutionFailure {
                    context: format!("recording version {next}"),
                    source,
                })
            })?;
        self.transition(EngineState::VersionPersisted);

        if transactional {
            self.db.commit().map_err(|source| {
                self.abort(MigrateError::TransactionFailure {
                    operation: "commit",
                    source,
                })
            })?;
        }

        self.transition(EngineState::Done);
        self.logger.info(&format!(
            "Migrated {} from {} to {}: {} statement(s) executed",
            direction, current, next, summary.executed
        ));
        if summary.failed > 0 {
            self.logger.error(&format!(
                "{} statement(s) failed and were skipped",
                summary.failed
            ));
        }

        Ok(MigrationOutcome {
            from: current,
            to: next,
            direction,
            summary,
        })
    }

    /// Steps 1-4. With `create_table` unset a missing tracking table is
    /// treated as empty instead of being created.
    fn select(
        &self,
        direction: Direction,
        target: Option<Version>,
        create_table: bool,
    ) -> MigrateResult<Selection> {
        let tracked = self.check_table(create_table)?;
        let all = self.read_statements()?;
        let current = self.current_version(tracked)?;

        let resolved = resolve_direction(&current, direction, target.as_ref());
        if resolved != direction {
            self.logger.info(&format!(
                "Target {} is below current version {}, migrating down",
                target.unwrap_or_default(),
                current
            ));
        }

        let selected = filter_statements(&current, &all, resolved, target.as_ref());
        self.transition(EngineState::Filtered);
        log::debug!("Selected {} of {} statements", selected.len(), all.len());

        Ok(Selection {
            current,
            direction: resolved,
            all,
            selected,
        })
    }

    /// Create the version-tracking table when it is missing.
    pub fn setup_database(&self) -> MigrateResult<()> {
        self.check_table(true).map(|_| ())
    }

    /// Whether the tracking table is there once this returns.
    fn check_table(&self, create: bool) -> MigrateResult<bool> {
        let table_setup = |source: DbError| MigrateError::TableSetup {
            table: self.repository.table_name().to_string(),
            source,
        };

        let mut exists = self.repository.does_exist().map_err(table_setup)?;
        if !exists && create {
            self.logger.info(&format!(
                "Creating migrations table {} ({})",
                self.repository.table_name(),
                self.db.db_type()
            ));
            self.repository.create_table().map_err(table_setup)?;
            exists = true;
        } else if !exists {
            log::debug!(
                "Migrations table {} does not exist yet",
                self.repository.table_name()
            );
        }

        self.transition(EngineState::TableChecked);
        Ok(exists)
    }

    /// Read and parse the configured migration script.
    pub fn read_statements(&self) -> MigrateResult<Vec<Statement>> {
        let path = self
            .options
            .migrations_file_path
            .as_ref()
            .ok_or(MigrateError::NoFilePath)?;

        let script = std::fs::read_to_string(path).map_err(|source| MigrateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let statements = parse_script(&script)?;

        self.transition(EngineState::Parsed);
        log::debug!(
            "Parsed {} statements from {}",
            statements.len(),
            path.display()
        );
        Ok(statements)
    }

    fn current_version(&self, tracked: bool) -> MigrateResult<Version> {
        let latest = if tracked {
            self.repository
                .get_latest()
                .map_err(|source| MigrateError::ExecutionFailure {
                    context: "reading the latest version".to_string(),
                    source,
                })?
        } else {
            None
        };

        let current = match latest {
            None => {
                self.logger
                    .info("No migration has been applied yet, starting from 0.0.0");
                Version::ZERO
            }
            Some(record) => {
                record
                    .parsed_version()
                    .ok_or(MigrateError::InvalidStoredVersion {
                        stored: record.version,
                    })?
            }
        };

        self.transition(EngineState::VersionResolved);
        Ok(current)
    }

    /// Roll back the open transaction, if any, and pick the error to report.
    fn abort(&self, err: MigrateError) -> MigrateError {
        if !self.options.with_transaction {
            return err;
        }
        match self.db.rollback() {
            Ok(()) => {
                self.logger.info("Transaction rolled back");
                err
            }
            Err(source) => {
                self.logger
                    .error(&format!("Rollback failed after: {}", err));
                MigrateError::TransactionFailure {
                    operation: "rollback",
                    source,
                }
            }
        }
    }

    fn transition(&self, next: EngineState) {
        let previous = self.state.replace(next);
        if previous != next {
            log::debug!("Engine state {} -> {}", previous, next);
        }
    }
}

/// Version recorded after a run: the target when one was given, otherwise
/// the highest version in the script going up, or the version below
/// `current` going down.
fn next_version(
    current: &Version,
    direction: Direction,
    target: Option<Version>,
    all: &[Statement],
) -> Version {
    match (target, direction) {
        (Some(target), _) => target,
        (None, Direction::Up) => latest_version(all),
        (None, Direction::Down) => previous_version(current, all),
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;

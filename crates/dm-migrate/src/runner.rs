//! Statement execution with the partial-failure policy.

use crate::error::{MigrateError, MigrateResult};
use crate::logger::MigrationLogger;
use dm_core::Statement;
use dm_db::Database;
use serde::Serialize;

/// Counts reported after a batch completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Statements that ran successfully
    pub executed: usize,
    /// Statements that failed and were skipped (non-transactional runs only)
    pub failed: usize,
}

/// Execute `statements` in order.
///
/// In a transactional run the first failure stops the batch and is returned;
/// the caller owns the transaction and rolls it back. Otherwise every
/// statement is attempted and failures are only reported through `logger`.
pub fn run_statements(
    db: &dyn Database,
    statements: &[Statement],
    transactional: bool,
    logger: &dyn MigrationLogger,
) -> MigrateResult<RunSummary> {
    let mut summary = RunSummary::default();

    for statement in statements {
        log::debug!("Executing {}", statement);
        match db.execute_batch(&statement.sql) {
            Ok(()) => summary.executed += 1,
            Err(source) if transactional => {
                return Err(MigrateError::ExecutionFailure {
                    context: format!(
                        "running v{} {} statement `{}`",
                        statement.version, statement.direction, statement.sql
                    ),
                    source,
                });
            }
            Err(err) => {
                summary.failed += 1;
                logger.error(&format!(
                    "v{} {} statement failed, continuing: {}",
                    statement.version, statement.direction, err
                ));
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;

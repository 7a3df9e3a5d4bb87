//! Statement selection
//!
//! Given the version recorded in the database, the requested direction and an
//! optional target, pick the statements that must run now. Selection filters
//! and never re-orders: the output keeps the script's order.

use crate::statement::{Direction, Statement};
use crate::version::Version;

/// Return the statements that must run, in script order.
///
/// See [`Statement::should_run`] for the per-statement rule.
pub fn filter_statements(
    current: &Version,
    statements: &[Statement],
    direction: Direction,
    target: Option<&Version>,
) -> Vec<Statement> {
    statements
        .iter()
        .filter(|s| s.should_run(current, direction, target))
        .cloned()
        .collect()
}

/// A target below the current version always means moving down.
pub fn resolve_direction(
    current: &Version,
    requested: Direction,
    target: Option<&Version>,
) -> Direction {
    match target {
        Some(target) if target.would_roll_back_to(current) => Direction::Down,
        _ => requested,
    }
}

/// Highest version among `statements`, or [`Version::ZERO`] when empty.
pub fn latest_version(statements: &[Statement]) -> Version {
    statements
        .iter()
        .map(|s| s.version)
        .max()
        .unwrap_or(Version::ZERO)
}

/// Highest version strictly below `current`, or [`Version::ZERO`] when there
/// is none. This is where a single down step lands.
pub fn previous_version(current: &Version, statements: &[Statement]) -> Version {
    statements
        .iter()
        .map(|s| s.version)
        .filter(|v| v.would_roll_back_to(current))
        .max()
        .unwrap_or(Version::ZERO)
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;

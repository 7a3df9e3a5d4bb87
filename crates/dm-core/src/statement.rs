//! Executable migration statements and their direction.

use crate::error::CoreError;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a statement applies a version (`Up`) or undoes it (`Down`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply forward (default)
    #[default]
    Up,
    /// Undo
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(CoreError::InvalidDirection {
                input: s.to_string(),
            }),
        }
    }
}

/// One executable unit of a migration script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// SQL text, terminated by `;`
    pub sql: String,

    /// Version block the statement belongs to
    pub version: Version,

    /// Direction sub-block the statement belongs to
    pub direction: Direction,
}

impl Statement {
    pub fn new(sql: impl Into<String>, version: Version, direction: Direction) -> Self {
        Self {
            sql: sql.into(),
            version,
            direction,
        }
    }

    /// Shorthand for an `Up` statement.
    pub fn up(sql: impl Into<String>, version: Version) -> Self {
        Self::new(sql, version, Direction::Up)
    }

    /// Shorthand for a `Down` statement.
    pub fn down(sql: impl Into<String>, version: Version) -> Self {
        Self::new(sql, version, Direction::Down)
    }

    /// Decide whether this statement must run when the database sits at
    /// `current` and the caller moves in `direction`, optionally bounded by
    /// `target`.
    ///
    /// With a target, `Up` selects `(current, target]` and `Down` selects
    /// `(target, current]`. Without one, `Up` selects everything above
    /// `current` and `Down` only undoes `current` itself.
    pub fn should_run(
        &self,
        current: &Version,
        direction: Direction,
        target: Option<&Version>,
    ) -> bool {
        if self.direction != direction {
            return false;
        }

        let v = &self.version;
        match (direction, target) {
            (Direction::Up, Some(target)) => v > current && v <= target,
            (Direction::Down, Some(target)) => v <= current && v > target,
            (Direction::Up, None) => v > current,
            (Direction::Down, None) => v == current,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[v{} {}] {}", self.version, self.direction, self.sql)
    }
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;

//! Three-part migration versions (`major.minor.patch`).
//!
//! Parsing is permissive about the *content* of each component:
//! a fragment that is not a non-negative integer counts as `0`. Only a result
//! that is entirely zero is rejected, with the exception of the literal
//! `"0.0.0"`, which names [`Version::ZERO`], the floor used when nothing has
//! been applied yet.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const VERSION_SEPARATOR: char = '.';
const VERSION_LETTER: char = 'v';
const ZERO_LITERAL: &str = "0.0.0";

/// A migration version, ordered by major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
}

impl Version {
    /// The floor version: no migration has ever been applied.
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
    };

    /// Build a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version tag such as `1`, `1.2`, `v1.2.3`.
    ///
    /// Returns `None` for text that yields an all-zero version, unless the
    /// text is exactly `0.0.0`. Components past the third are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix(VERSION_LETTER).unwrap_or(text);

        if text == ZERO_LITERAL {
            return Some(Self::ZERO);
        }

        let mut components = [0u64; 3];
        for (slot, fragment) in components.iter_mut().zip(text.split(VERSION_SEPARATOR)) {
            *slot = fragment.parse().unwrap_or(0);
        }

        let version = Self::new(components[0], components[1], components[2]);
        if version.is_zero() {
            None
        } else {
            Some(version)
        }
    }

    /// Whether this is the floor version.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// True iff `self` sits strictly below `other`, i.e. moving down from
    /// `other` would land on or pass `self`.
    pub fn would_roll_back_to(&self, other: &Version) -> bool {
        self < other
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s).ok_or_else(|| CoreError::InvalidVersion {
            input: s.to_string(),
        })
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;

//! Direction-scoped include/exclude rules.
//!
//! A [`FilterGroup`] can only be obtained through validated construction
//! ([`FilterGroup::new`] or `TryFrom<RawFilterGroup>`), so every group that
//! reaches the command builder has a known direction, a known kind and at
//! least one pattern.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which way a transfer moves files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Local proxy tree to remote host.
    Push,
    /// Remote host to local proxy tree.
    Pull,
}

impl Direction {
    /// Lowercase literal used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            other => Err(Error::InvalidDirection(other.to_string())),
        }
    }
}

/// Whether a group's patterns are passed as `--include` or `--exclude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Emit `--include=PATTERN`.
    Include,
    /// Emit `--exclude=PATTERN`.
    Exclude,
}

impl Kind {
    /// Lowercase literal, also the rsync flag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            other => Err(Error::InvalidKind(other.to_string())),
        }
    }
}

/// A filter record exactly as it appears in `osync.toml`, before validation.
///
/// Literals stay strings here so that an unknown value is reported with the
/// crate's own "not a valid Direction/Kind" message instead of a serde one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilterGroup {
    /// Expected to be `push` or `pull`.
    pub direction: String,
    /// Expected to be `include` or `exclude`.
    pub kind: String,
    /// Must contain at least one pattern; a missing key reads as empty.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// One validated include/exclude rule scoped to a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterGroup {
    /// Transfer direction this rule applies to
    direction: Direction,
    /// Include or exclude
    kind: Kind,
    /// Ordered rsync patterns, never empty
    patterns: Vec<String>,
}

impl FilterGroup {
    /// Creates a group, rejecting an empty pattern list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPatterns`] when `patterns` is empty.
    pub fn new(direction: Direction, kind: Kind, patterns: Vec<String>) -> Result<Self> {
        if patterns.is_empty() {
            return Err(Error::EmptyPatterns(format!("{direction} {kind}")));
        }
        Ok(Self {
            direction,
            kind,
            patterns,
        })
    }

    /// Direction this group is scoped to.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Include or exclude.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Patterns in configuration order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether this group takes part in a transfer going `direction`.
    #[must_use]
    pub fn applies_to(&self, direction: Direction) -> bool {
        self.direction == direction
    }

    /// One `--{kind}={pattern}` token per pattern, order preserved.
    #[must_use]
    pub fn rsync_args(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|pattern| format!("--{}={pattern}", self.kind))
            .collect()
    }
}

impl TryFrom<RawFilterGroup> for FilterGroup {
    type Error = Error;

    fn try_from(raw: RawFilterGroup) -> Result<Self> {
        let direction = raw.direction.parse()?;
        let kind = raw.kind.parse()?;
        Self::new(direction, kind, raw.patterns)
    }
}

/// Validates an ordered list of raw records, stopping at the first bad one.
///
/// # Errors
///
/// Returns the validation error of the first invalid record.
pub fn validate_all(raw: Vec<RawFilterGroup>) -> Result<Vec<FilterGroup>> {
    raw.into_iter().map(FilterGroup::try_from).collect()
}

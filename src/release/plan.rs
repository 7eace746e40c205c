//! Version calculation for release candidates
//!
//! The marker file holds the snapshot version under development. A run
//! releases exactly that version (suffix stripped) and advances the main
//! line to the next snapshot, chosen by the increment level. All names
//! derive from those two versions: the rc identifier, the release tag and
//! the candidate tag.

use crate::core::error::{CutError, CutResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Suffix marking ongoing, unreleased development
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Version component the next development cycle increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  /// Bug-fix line continues (x.y.z+1)
  Patch,
  /// New features next (x.y+1.0)
  Minor,
  /// Breaking changes next (x+1.0.0)
  Major,
}

impl Level {
  /// Apply the increment to a version, zeroing subordinate components
  pub fn apply(&self, version: &semver::Version) -> semver::Version {
    match self {
      Level::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
      Level::Minor => semver::Version::new(version.major, version.minor + 1, 0),
      Level::Major => semver::Version::new(version.major + 1, 0, 0),
    }
  }
}

impl FromStr for Level {
  type Err = String;

  /// Short forms are case-sensitive: `m` is minor, `M` is major
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "p" | "patch" => Ok(Level::Patch),
      "m" | "minor" => Ok(Level::Minor),
      "M" | "major" => Ok(Level::Major),
      other => Err(format!(
        "invalid increment level '{}' (expected p|patch|m|minor|M|major)",
        other
      )),
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Level::Patch => write!(f, "patch"),
      Level::Minor => write!(f, "minor"),
      Level::Major => write!(f, "major"),
    }
  }
}

/// Version as written in the marker file
///
/// A strict grammar: `major.minor.patch` optionally suffixed `-SNAPSHOT`
/// (any case). Anything else (extra components, other pre-release tags,
/// build metadata) is rejected with a descriptive error instead of being
/// split into silently wrong integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerVersion {
  /// The bare version triple, suffix stripped
  pub base: semver::Version,
  /// Whether the marker carried the snapshot suffix
  pub snapshot: bool,
}

impl MarkerVersion {
  /// Parse marker contents, tolerating surrounding whitespace only
  pub fn parse(contents: &str) -> CutResult<Self> {
    const GRAMMAR_HELP: &str = "Versions are MAJOR.MINOR.PATCH, optionally suffixed -SNAPSHOT.";

    let trimmed = contents.trim();
    let version = semver::Version::parse(trimmed)
      .map_err(|e| CutError::with_help(format!("Malformed version '{}': {}", trimmed, e), GRAMMAR_HELP))?;

    if !version.build.is_empty() {
      return Err(CutError::with_help(
        format!("Malformed version '{}': build metadata is not allowed in the marker", trimmed),
        GRAMMAR_HELP,
      ));
    }

    let snapshot = if version.pre.is_empty() {
      false
    } else if version.pre.as_str().eq_ignore_ascii_case(SNAPSHOT_SUFFIX) {
      true
    } else {
      return Err(CutError::with_help(
        format!(
          "Malformed version '{}': unrecognized suffix '-{}'",
          trimmed,
          version.pre.as_str()
        ),
        GRAMMAR_HELP,
      ));
    };

    Ok(Self {
      base: semver::Version::new(version.major, version.minor, version.patch),
      snapshot,
    })
  }
}

impl fmt::Display for MarkerVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.snapshot {
      write!(f, "{}-{}", self.base, SNAPSHOT_SUFFIX)
    } else {
      write!(f, "{}", self.base)
    }
  }
}

/// Everything one run derives from the marker, computed once up front
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
  /// Version being released (no suffix)
  pub release_version: semver::Version,
  /// Next development version committed back to the main line
  pub next_snapshot: String,
  /// Candidate sequence number
  pub rc_number: u32,
  /// Candidate identifier, also the staging branch name
  pub rc_version: String,
  /// Final release tag; names the artifact
  pub release_tag: String,
  /// Candidate tag, signed and pushed at publish time
  pub rc_tag: String,
}

impl ReleasePlan {
  /// Compute the plan from marker contents or an explicit override
  ///
  /// The override replaces the marker as the version source and goes
  /// through the same strict grammar.
  pub fn compute(
    marker: &str,
    override_version: Option<&str>,
    level: Level,
    rc_number: u32,
    tag_prefix: &str,
  ) -> CutResult<Self> {
    let source = override_version.unwrap_or(marker);
    let parsed = MarkerVersion::parse(source)?;

    let release_version = parsed.base;
    let next_snapshot = format!("{}-{}", level.apply(&release_version), SNAPSHOT_SUFFIX);
    let rc_version = format!("{}-rc{}", release_version, rc_number);
    let release_tag = format!("{}-{}", tag_prefix, release_version);
    let rc_tag = format!("{}-rc{}", release_tag, rc_number);

    Ok(Self {
      release_version,
      next_snapshot,
      rc_number,
      rc_version,
      release_tag,
      rc_tag,
    })
  }
}

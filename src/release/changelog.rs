//! Changelog generation from commit history
//!
//! Collects subjects since the previous release tag (or the whole history
//! for a first release), groups conventional commits into titled sections
//! and prepends the rendered entry to the changelog file. Commits that
//! don't follow the convention land in a trailing section instead of
//! being dropped.

use crate::core::error::CutResult;
use crate::core::vcs::SystemGit;
use crate::release::plan::ReleasePlan;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Conventional commit kind, ordered the way sections render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommitKind {
  Feat,
  Fix,
  Perf,
  Docs,
  Refactor,
  Test,
  Chore,
  Other,
}

impl CommitKind {
  /// Classify a commit subject by its conventional prefix
  fn from_subject(subject: &str) -> Self {
    let prefix = subject
      .split_once(':')
      .map(|(head, _)| head)
      .unwrap_or("")
      .trim_end_matches('!');
    let kind = prefix.split_once('(').map(|(kind, _)| kind).unwrap_or(prefix);

    match kind.to_lowercase().as_str() {
      "feat" | "feature" => Self::Feat,
      "fix" => Self::Fix,
      "perf" => Self::Perf,
      "docs" | "doc" => Self::Docs,
      "refactor" => Self::Refactor,
      "test" | "tests" => Self::Test,
      "chore" => Self::Chore,
      _ => Self::Other,
    }
  }

  /// Section heading for this kind
  fn display_name(&self) -> &'static str {
    match self {
      Self::Feat => "Features",
      Self::Fix => "Bug Fixes",
      Self::Perf => "Performance",
      Self::Docs => "Documentation",
      Self::Refactor => "Refactoring",
      Self::Test => "Tests",
      Self::Chore => "Chores",
      Self::Other => "Other Changes",
    }
  }
}

/// One rendered changelog line
#[derive(Debug, Clone)]
struct CommitLine {
  description: String,
  short_sha: String,
  breaking: bool,
}

impl CommitLine {
  fn from_log(sha: &str, subject: &str, kind: CommitKind) -> Self {
    // "type(scope)!: description": keep the description, flag the bang.
    // Non-conventional subjects keep their full text.
    let (head, description) = match (kind, subject.split_once(':')) {
      (CommitKind::Other, _) | (_, None) => ("", subject.trim()),
      (_, Some((head, rest))) => (head, rest.trim()),
    };

    Self {
      description: description.to_string(),
      short_sha: sha.chars().take(7).collect(),
      breaking: head.ends_with('!'),
    }
  }
}

/// Changelog entry for one release
#[derive(Debug)]
pub struct ChangelogEntry {
  version: String,
  date: String,
  sections: BTreeMap<CommitKind, Vec<CommitLine>>,
}

impl ChangelogEntry {
  /// Collect history for the release being cut
  ///
  /// Ranges from the most recent `<prefix>-*` tag when one exists, the
  /// whole history otherwise.
  pub fn collect(git: &SystemGit, plan: &ReleasePlan, tag_prefix: &str, date: &str) -> CutResult<Self> {
    let previous = git.latest_tag(&format!("{}-*", tag_prefix))?;
    let range = previous.as_ref().map(|tag| format!("{}..HEAD", tag));
    let commits = git.log_subjects(range.as_deref())?;

    Ok(Self::from_commits(plan.release_version.to_string(), date.to_string(), &commits))
  }

  /// Build an entry from `(sha, subject)` pairs, newest first
  fn from_commits(version: String, date: String, commits: &[(String, String)]) -> Self {
    let mut sections: BTreeMap<CommitKind, Vec<CommitLine>> = BTreeMap::new();

    for (sha, subject) in commits {
      let kind = CommitKind::from_subject(subject);
      sections.entry(kind).or_default().push(CommitLine::from_log(sha, subject, kind));
    }

    Self { version, date, sections }
  }

  /// Render as markdown
  pub fn to_markdown(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("## [{}] - {}\n\n", self.version, self.date));

    if self.sections.is_empty() {
      output.push_str("_No changes recorded._\n\n");
      return output;
    }

    for (kind, lines) in &self.sections {
      output.push_str(&format!("### {}\n\n", kind.display_name()));

      for line in lines {
        let marker = if line.breaking { " **BREAKING**" } else { "" };
        output.push_str(&format!("- {}{} ({})\n", line.description, marker, line.short_sha));
      }

      output.push('\n');
    }

    output
  }

  /// Prepend this entry to the changelog file
  ///
  /// A missing file is created with a header; an existing header keeps
  /// its place, with the new entry inserted directly below it.
  pub fn prepend_to(&self, path: &Path, project_name: &str) -> CutResult<()> {
    let entry = self.to_markdown();

    let existing = if path.exists() {
      fs::read_to_string(path)?
    } else {
      format!(
        "# Changelog\n\nAll notable changes to {} are documented in this file.\n\n",
        project_name
      )
    };

    let updated = if existing.starts_with("# Changelog") {
      match existing.find("\n## ") {
        Some(first_entry) => {
          let (header, rest) = existing.split_at(first_entry + 1);
          format!("{}{}{}", header, entry, rest)
        }
        None => format!("{}{}", existing, entry),
      }
    } else {
      format!("{}{}", entry, existing)
    };

    fs::write(path, updated)?;
    Ok(())
  }
}

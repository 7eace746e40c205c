//! Release-workflow operations for SystemGit
//!
//! Everything the cut sequence needs from the repository: precondition
//! probes, history for the changelog, branch and tag manipulation, the
//! source archive, and pushes.

use super::system_git::SystemGit;
use crate::core::error::{CutError, CutResult, GitError, ResultExt};
use std::path::Path;

impl SystemGit {
  /// Refresh remote refs before validating anything against them
  pub fn fetch(&self, remote: &str) -> CutResult<()> {
    self.run(&["fetch", remote])?;
    Ok(())
  }

  /// Check that the working tree has no uncommitted changes
  ///
  /// Uses `git status --porcelain`; untracked files count as dirty, the
  /// archive must match the committed tree exactly.
  pub fn is_clean(&self) -> CutResult<bool> {
    let status = self.run(&["status", "--porcelain"])?;
    Ok(status.is_empty())
  }

  /// Check whether a tag exists locally
  pub fn tag_exists(&self, tag: &str) -> CutResult<bool> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet", &format!("refs/tags/{}", tag)])
      .output()
      .context("Failed to check tag existence")?;

    Ok(output.status.success())
  }

  /// Most recent reachable tag matching a glob pattern, if any
  ///
  /// Returns None when no matching tag exists (first release).
  pub fn latest_tag(&self, pattern: &str) -> CutResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["describe", "--tags", "--abbrev=0", &format!("--match={}", pattern)])
      .output()
      .context("Failed to find latest tag")?;

    if !output.status.success() {
      return Ok(None);
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if tag.is_empty() { None } else { Some(tag) })
  }

  /// Commit subjects for a range, newest first
  ///
  /// Returns `(sha, subject)` pairs. `range` is `<tag>..HEAD` for
  /// incremental changelogs or None for the whole history.
  pub fn log_subjects(&self, range: Option<&str>) -> CutResult<Vec<(String, String)>> {
    let mut args = vec!["log", "--no-merges", "--pretty=format:%H|||%s"];
    if let Some(range) = range {
      args.push(range);
    }

    let stdout = self.run(&args)?;

    let mut commits = Vec::new();
    for line in stdout.lines() {
      if let Some((sha, subject)) = line.split_once("|||") {
        commits.push((sha.trim().to_string(), subject.trim().to_string()));
      }
    }

    Ok(commits)
  }

  /// Stage one file and commit it with the given message
  pub fn commit_file(&self, path: &Path, message: &str) -> CutResult<()> {
    let path_str = path.to_string_lossy();
    self.run(&["add", "--", path_str.as_ref()])?;
    self.run(&["commit", "-m", message])?;
    Ok(())
  }

  /// Create a branch at HEAD and switch to it
  pub fn create_and_checkout_branch(&self, name: &str) -> CutResult<()> {
    self.run(&["checkout", "-b", name])?;
    Ok(())
  }

  /// Switch to an existing branch
  pub fn checkout(&self, name: &str) -> CutResult<()> {
    self.run(&["checkout", name])?;
    Ok(())
  }

  /// Archive a tree into a gzip-compressed tarball
  ///
  /// Every entry is placed under `prefix` so the tarball unpacks into a
  /// single release-named directory.
  pub fn archive(&self, treeish: &str, prefix: &str, output: &Path) -> CutResult<()> {
    let output_str = output.to_string_lossy();
    self.run(&[
      "archive",
      "--format=tar.gz",
      &format!("--prefix={}", prefix),
      "-o",
      output_str.as_ref(),
      treeish,
    ])?;
    Ok(())
  }

  /// Create a signed annotated tag pointing at a specific commit
  ///
  /// With an identity, signs as that key (`-u`); otherwise signs with the
  /// default key (`-s`).
  pub fn create_signed_tag(&self, tag: &str, target: &str, identity: Option<&str>, message: &str) -> CutResult<()> {
    match identity {
      Some(identity) => self.run(&["tag", "-u", identity, "-m", message, tag, target])?,
      None => self.run(&["tag", "-s", "-m", message, tag, target])?,
    };
    Ok(())
  }

  /// Push a refspec to a remote
  pub fn push(&self, remote: &str, refspec: &str) -> CutResult<()> {
    let output = self
      .git_cmd()
      .args(["push", remote, refspec])
      .output()
      .context("Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(CutError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        refspec: refspec.to_string(),
        reason: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }
}

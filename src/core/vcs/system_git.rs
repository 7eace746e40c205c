//! Repository handle backed by the system git binary
//!
//! Uses porcelain-stable plumbing commands with an isolated environment so
//! user configuration cannot change behavior mid-release.

use crate::core::error::{CutError, CutResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Handle to a git working tree
pub struct SystemGit {
  /// Working tree root (resolved via `git rev-parse --show-toplevel`)
  work_tree: PathBuf,
}

impl SystemGit {
  /// Open the repository containing `path`
  ///
  /// One subprocess call resolves the working tree root; every later
  /// command runs against that root regardless of the invocation directory.
  pub fn open(path: &Path) -> CutResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(CutError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(CutError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);

    Ok(Self {
      work_tree: PathBuf::from(stdout.trim()),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> CutResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  /// Get current branch name ("HEAD" when detached)
  pub fn current_branch(&self) -> CutResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Run a git command, returning trimmed stdout
  ///
  /// Any non-zero exit is a [`GitError::CommandFailed`] carrying the full
  /// command line and stderr; the orchestrator treats that as fatal.
  pub(crate) fn run(&self, args: &[&str]) -> CutResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.first().copied().unwrap_or("")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(CutError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Runs against the working tree root
  /// - Clears environment variables, whitelisting PATH and HOME
  /// - Overrides config that would alter output parsing
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }
    // Signed tags shell out to gpg underneath git
    if let Ok(gnupghome) = std::env::var("GNUPGHOME") {
      cmd.env("GNUPGHOME", gnupghome);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

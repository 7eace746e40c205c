//! Release session context - build once, pass everywhere
//!
//! The working directory and the current branch are shared mutable state;
//! everything that needs to know where the run started reads it from here
//! instead of re-deriving it mid-flight. `WorkdirGuard` scopes directory
//! changes with guaranteed restoration on all exit paths.

use crate::core::config::CutConfig;
use crate::core::error::CutResult;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};

/// Session state for one release-candidate run
///
/// Built once at startup: repository handle, configuration, and the branch
/// and commit the run started from. The start commit anchors the rollback
/// instructions; the original branch is restored on success.
pub struct ReleaseContext {
  /// Working tree root (absolute path)
  pub root: PathBuf,

  /// Configuration (relcut.toml or defaults)
  pub config: CutConfig,

  /// Repository handle
  pub git: SystemGit,

  /// Branch checked out when the run started
  pub original_branch: String,

  /// HEAD commit when the run started, before any mutation
  pub start_commit: String,
}

impl ReleaseContext {
  /// Build the context from the invocation directory
  pub fn build(invocation_dir: &Path) -> CutResult<Self> {
    let git = SystemGit::open(invocation_dir)?;
    let root = git.work_tree().to_path_buf();
    let config = CutConfig::load_or_default(&root)?;
    let original_branch = git.current_branch()?;
    let start_commit = git.head_commit()?;

    Ok(Self {
      root,
      config,
      git,
      original_branch,
      start_commit,
    })
  }

  /// Absolute path of the version marker file
  pub fn marker_path(&self) -> PathBuf {
    self.root.join(&self.config.repo.marker_file)
  }

  /// Absolute path of the changelog file
  pub fn changelog_path(&self) -> PathBuf {
    self.root.join(&self.config.repo.changelog_file)
  }

  /// Absolute path of the artifact output directory
  pub fn output_dir(&self) -> PathBuf {
    self.root.join(&self.config.artifact.output_dir)
  }
}

/// Scoped working-directory change
///
/// Restores the previous working directory when dropped, on success and
/// failure alike. Holding the guard is the only sanctioned way to change
/// directories during a run.
pub struct WorkdirGuard {
  previous: PathBuf,
}

impl WorkdirGuard {
  /// Change into `dir`, remembering the current directory
  pub fn enter(dir: &Path) -> CutResult<Self> {
    let previous = std::env::current_dir()?;
    std::env::set_current_dir(dir)?;
    Ok(Self { previous })
  }
}

impl Drop for WorkdirGuard {
  fn drop(&mut self) {
    // Nothing useful to do if the original directory vanished mid-run
    let _ = std::env::set_current_dir(&self.previous);
  }
}

//! Distribution store client backed by the system svn binary
//!
//! Published candidates land in an svn-style store: one directory per rc,
//! holding the tarball, signature and digest sidecars. Only the publish
//! path touches this; dry runs never construct a client.

use crate::core::error::{CutError, CutResult, ToolError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

const SVN: &str = "svn";

/// Handle to the remote distribution store
pub struct DistStore {
  url: String,
}

impl DistStore {
  pub fn new(url: &str) -> Self {
    Self {
      url: url.trim_end_matches('/').to_string(),
    }
  }

  /// URL of the directory holding one candidate's artifacts
  pub fn candidate_url(&self, name: &str) -> String {
    format!("{}/{}", self.url, name)
  }

  /// Create the candidate directory remotely, with a log message
  pub fn create_directory(&self, name: &str, message: &str) -> CutResult<()> {
    self.svn(None, &["mkdir", "-m", message, &self.candidate_url(name)])?;
    Ok(())
  }

  /// Add files to the candidate directory and commit them remotely
  ///
  /// Checks the directory out metadata-only (`--depth=empty`) into a
  /// scratch directory under `scratch_parent`, copies the files in, adds
  /// and commits them. The scratch checkout is removed afterwards.
  pub fn publish_files(&self, name: &str, files: &[PathBuf], scratch_parent: &Path, message: &str) -> CutResult<()> {
    let scratch = scratch_parent.join(format!(".dist-{}", name));
    if scratch.exists() {
      fs::remove_dir_all(&scratch)?;
    }

    let scratch_str = scratch.to_string_lossy().into_owned();
    self.svn(None, &["checkout", "--depth=empty", &self.candidate_url(name), &scratch_str])?;

    for file in files {
      let file_name = file
        .file_name()
        .ok_or_else(|| CutError::message(format!("Artifact path has no file name: {}", file.display())))?;
      fs::copy(file, scratch.join(file_name))?;
      self.svn(Some(&scratch), &["add", &file_name.to_string_lossy()])?;
    }

    self.svn(Some(&scratch), &["commit", "-m", message])?;

    fs::remove_dir_all(&scratch)?;
    Ok(())
  }

  /// Run an svn command, distinguishing a missing binary from a failure
  fn svn(&self, cwd: Option<&Path>, args: &[&str]) -> CutResult<String> {
    let mut cmd = Command::new(SVN);
    if let Some(cwd) = cwd {
      cmd.current_dir(cwd);
    }
    cmd.args(args);

    let output = cmd.output().map_err(|e| match e.kind() {
      io::ErrorKind::NotFound => CutError::Tool(ToolError::Missing {
        program: SVN.to_string(),
      }),
      _ => CutError::Io(e),
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(CutError::Tool(ToolError::Failed {
        program: format!("{} {}", SVN, args.first().copied().unwrap_or("")),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

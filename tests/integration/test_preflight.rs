//! Integration tests for precondition failures and error reporting
//!
//! Every failure must exit 1, and anything failing before the first commit
//! must leave the repository untouched.

use crate::helpers::{TestRepo, run};
use anyhow::Result;
use std::fs;

#[test]
fn test_dirty_tree_aborts_before_mutation() -> Result<()> {
  let repo = TestRepo::new()?;
  fs::write(repo.path.join("README.md"), "# changed\n")?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted changes"));

  assert!(!repo.exists("CHANGELOG.md"));
  assert_eq!(repo.read("VERSION")?.trim(), "0.1.0-SNAPSHOT");

  Ok(())
}

#[test]
fn test_wrong_branch_aborts() -> Result<()> {
  let repo = TestRepo::new()?;
  run("git", &repo.path, &["checkout", "-b", "topic"])?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("main"));
  assert!(stderr.contains("topic"));

  Ok(())
}

#[test]
fn test_non_snapshot_marker_aborts() -> Result<()> {
  let repo = TestRepo::new()?;
  fs::write(repo.path.join("VERSION"), "0.1.0\n")?;
  repo.commit_all("Drop snapshot suffix")?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("not a snapshot"));

  Ok(())
}

#[test]
fn test_malformed_marker_aborts() -> Result<()> {
  let repo = TestRepo::new()?;
  fs::write(repo.path.join("VERSION"), "not-a-version\n")?;
  repo.commit_all("Break the marker")?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Malformed version"));

  Ok(())
}

#[test]
fn test_missing_marker_aborts() -> Result<()> {
  let repo = TestRepo::new()?;
  fs::remove_file(repo.path.join("VERSION"))?;
  repo.commit_all("Remove the marker")?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("not found"));

  Ok(())
}

#[test]
fn test_existing_release_tag_aborts_before_mutation() -> Result<()> {
  let repo = TestRepo::new()?;
  run("git", &repo.path, &["tag", "demo-0.1.0"])?;
  let head_before = repo.git_out(&["rev-parse", "HEAD"])?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("demo-0.1.0"));
  assert!(stderr.contains("already exists"));

  // Idempotent safety check: nothing was committed or branched
  assert_eq!(repo.git_out(&["rev-parse", "HEAD"])?, head_before);
  assert!(!repo.branch_exists("0.1.0-rc0")?);

  Ok(())
}

#[test]
fn test_existing_rc_tag_aborts() -> Result<()> {
  let repo = TestRepo::new()?;
  run("git", &repo.path, &["tag", "demo-0.1.0-rc0"])?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("demo-0.1.0-rc0"));

  Ok(())
}

#[test]
fn test_unknown_flag_exits_one() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relcut(&["--frobnicate"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_invalid_level_exits_one() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relcut(&["-l", "x"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("invalid increment level"));

  Ok(())
}

#[test]
fn test_invalid_positional_exits_one() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relcut(&["bogus"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_help_exits_zero() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relcut(&["-h"])?;
  assert_eq!(output.status.code(), Some(0));
  assert!(String::from_utf8_lossy(&output.stdout).contains("--publish"));

  Ok(())
}

#[test]
fn test_failed_signing_prints_rollback_guidance() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.use_failing_signer()?;
  let start_commit = repo.git_out(&["rev-parse", "HEAD"])?;

  let output = repo.relcut(&[])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);

  // The advisor names every manual recovery step with concrete arguments
  assert!(stderr.contains("git checkout main"));
  assert!(stderr.contains(&format!("git reset --hard {}", start_commit)));
  assert!(stderr.contains("git tag -d demo-0.1.0-rc0"));
  assert!(stderr.contains("git branch -D 0.1.0-rc0"));

  // The main line had already advanced when signing failed; the advisory
  // covers the divergence rather than reordering the workflow
  assert_eq!(repo.git_out(&["show", "main:VERSION"])?, "0.1.1-SNAPSHOT");

  Ok(())
}

//! Integration tests for the dry-run cut workflow

use crate::helpers::TestRepo;
use anyhow::Result;

#[test]
fn test_dry_run_cuts_candidate() -> Result<()> {
  let repo = TestRepo::new()?;
  let origin_before = repo.origin_main_sha()?;

  let output = repo.relcut_ok(&[])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  // Main line advanced to the next snapshot and is checked out again
  assert_eq!(repo.read("VERSION")?.trim(), "0.1.1-SNAPSHOT");
  assert_eq!(repo.git_out(&["rev-parse", "--abbrev-ref", "HEAD"])?, "main");

  // Changelog committed on the main line
  assert!(repo.exists("CHANGELOG.md"));
  assert!(repo.read("CHANGELOG.md")?.contains("## [0.1.0]"));

  // Staging branch carries the bare release version
  assert!(repo.branch_exists("0.1.0-rc0")?);
  assert_eq!(repo.git_out(&["show", "0.1.0-rc0:VERSION"])?, "0.1.0");

  // Artifact set: tarball, signature, four digest sidecars
  assert!(repo.exists("dist/demo-0.1.0.tar.gz"));
  assert_eq!(repo.read("dist/demo-0.1.0.tar.gz.asc")?, "FAKE SIGNATURE\n");
  for extension in ["md5", "sha1", "sha256", "sha512"] {
    assert!(
      repo.exists(&format!("dist/demo-0.1.0.tar.gz.{}", extension)),
      "missing {} sidecar",
      extension
    );
  }

  // Dry run: no tags, nothing pushed
  assert_eq!(repo.git_out(&["tag", "--list"])?, "");
  assert_eq!(repo.origin_main_sha()?, origin_before);

  // The vote announcement is printed regardless of mode
  assert!(stdout.contains("[VOTE] Release demo 0.1.0 (rc0)"));
  assert!(stdout.contains("The vote is open until"));

  Ok(())
}

#[test]
fn test_digest_sidecars_are_sum_compatible() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.relcut_ok(&[])?;

  for (extension, hex_len) in [("md5", 32), ("sha1", 40), ("sha256", 64), ("sha512", 128)] {
    let sidecar = repo.read(&format!("dist/demo-0.1.0.tar.gz.{}", extension))?;
    let (hex, name) = sidecar
      .split_once("  ")
      .unwrap_or_else(|| panic!("{} sidecar is not in sum format: {:?}", extension, sidecar));

    assert_eq!(hex.len(), hex_len, "{} digest length", extension);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(name.trim(), "demo-0.1.0.tar.gz");
  }

  Ok(())
}

#[test]
fn test_minor_level_changes_snapshot_not_release() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.relcut_ok(&["-l", "m"])?;

  // The level picks the next development version only
  assert_eq!(repo.read("VERSION")?.trim(), "0.2.0-SNAPSHOT");
  assert!(repo.branch_exists("0.1.0-rc0")?);
  assert!(repo.exists("dist/demo-0.1.0.tar.gz"));

  Ok(())
}

#[test]
fn test_major_level_zeroes_minor_and_patch() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.relcut_ok(&["--level", "major"])?;

  assert_eq!(repo.read("VERSION")?.trim(), "1.0.0-SNAPSHOT");

  Ok(())
}

#[test]
fn test_rc_number_names_branch_not_artifact() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.relcut_ok(&["-r", "3"])?;

  assert!(repo.branch_exists("0.1.0-rc3")?);
  assert!(!repo.branch_exists("0.1.0-rc0")?);
  // The artifact is named by the release tag, not the candidate
  assert!(repo.exists("dist/demo-0.1.0.tar.gz"));

  Ok(())
}

#[test]
fn test_json_plan_mode_does_not_mutate() -> Result<()> {
  let repo = TestRepo::new()?;
  let head_before = repo.git_out(&["rev-parse", "HEAD"])?;

  let output = repo.relcut_ok(&["--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let plan: serde_json::Value = serde_json::from_str(stdout.trim())?;

  assert_eq!(plan["release_version"], "0.1.0");
  assert_eq!(plan["next_snapshot"], "0.1.1-SNAPSHOT");
  assert_eq!(plan["rc_version"], "0.1.0-rc0");
  assert_eq!(plan["release_tag"], "demo-0.1.0");
  assert_eq!(plan["rc_tag"], "demo-0.1.0-rc0");

  // Inspection only: no commits, no branch, no changelog, marker untouched
  assert_eq!(repo.git_out(&["rev-parse", "HEAD"])?, head_before);
  assert!(!repo.branch_exists("0.1.0-rc0")?);
  assert!(!repo.exists("CHANGELOG.md"));
  assert_eq!(repo.read("VERSION")?.trim(), "0.1.0-SNAPSHOT");

  Ok(())
}

#[test]
fn test_version_override_drives_plan() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relcut_ok(&["--json", "-v", "2.5.0"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let plan: serde_json::Value = serde_json::from_str(stdout.trim())?;

  assert_eq!(plan["release_version"], "2.5.0");
  assert_eq!(plan["next_snapshot"], "2.5.1-SNAPSHOT");
  assert_eq!(plan["rc_tag"], "demo-2.5.0-rc0");

  Ok(())
}

#[test]
fn test_changelog_groups_conventional_commits() -> Result<()> {
  let repo = TestRepo::new()?;

  std::fs::write(repo.path.join("feature.txt"), "feature\n")?;
  repo.commit_all("feat: add the feature")?;
  std::fs::write(repo.path.join("fix.txt"), "fix\n")?;
  repo.commit_all("fix(core): correct the behavior")?;

  repo.relcut_ok(&[])?;

  let changelog = repo.read("CHANGELOG.md")?;
  assert!(changelog.contains("### Features"));
  assert!(changelog.contains("- add the feature"));
  assert!(changelog.contains("### Bug Fixes"));
  assert!(changelog.contains("- correct the behavior"));

  Ok(())
}

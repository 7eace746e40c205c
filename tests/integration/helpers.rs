//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A test repository with a snapshot marker, a bare origin remote, and a
/// stub signing program standing in for gpg
pub struct TestRepo {
  _root: TempDir,
  scratch: PathBuf,
  pub path: PathBuf,
  pub origin: PathBuf,
}

impl TestRepo {
  /// Create a repository one commit deep, pushed to a local bare origin
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let scratch = root.path().to_path_buf();
    let path = scratch.join("work");
    let origin = scratch.join("origin.git");
    fs::create_dir_all(&path)?;

    // Bare origin so fetch and push have a real remote to talk to
    run("git", &scratch, &["init", "--bare", "--initial-branch=main", "origin.git"])?;

    run("git", &path, &["init", "--initial-branch=main"])?;
    run("git", &path, &["config", "user.name", "Test User"])?;
    run("git", &path, &["config", "user.email", "test@example.com"])?;

    let signer = write_signer_script(
      &scratch,
      "stub-signer.sh",
      concat!(
        "#!/bin/sh\n",
        "# gpg stand-in: emit a fake detached signature at --output\n",
        "out=\"\"\n",
        "prev=\"\"\n",
        "for arg in \"$@\"; do\n",
        "  if [ \"$prev\" = \"--output\" ]; then out=\"$arg\"; fi\n",
        "  prev=\"$arg\"\n",
        "done\n",
        "[ -n \"$out\" ] || exit 1\n",
        "printf 'FAKE SIGNATURE\\n' > \"$out\"\n",
      ),
    )?;

    fs::write(path.join("VERSION"), "0.1.0-SNAPSHOT\n")?;
    fs::write(path.join("README.md"), "# demo\n")?;
    fs::write(path.join(".gitignore"), "dist/\n.dist-*\n")?;
    write_config(&path, &signer)?;

    run("git", &path, &["add", "."])?;
    run("git", &path, &["commit", "-m", "Initial import"])?;
    run("git", &path, &["remote", "add", "origin", origin.to_str().unwrap()])?;
    run("git", &path, &["push", "-u", "origin", "main"])?;

    Ok(Self {
      _root: root,
      scratch,
      path,
      origin,
    })
  }

  /// Swap the stub signer for one that always fails, committing the change
  pub fn use_failing_signer(&self) -> Result<()> {
    let failer = write_signer_script(&self.scratch, "failing-signer.sh", "#!/bin/sh\nexit 1\n")?;
    write_config(&self.path, &failer)?;
    self.commit_all("Use failing signer")?;
    Ok(())
  }

  /// Stage everything and commit, returning the new HEAD sha
  pub fn commit_all(&self, message: &str) -> Result<String> {
    run("git", &self.path, &["add", "-A"])?;
    run("git", &self.path, &["commit", "-m", message])?;
    self.git_out(&["rev-parse", "HEAD"])
  }

  /// Run git in the work tree, expecting success, returning trimmed stdout
  pub fn git_out(&self, args: &[&str]) -> Result<String> {
    let output = run("git", &self.path, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Run git in the work tree without asserting success
  pub fn git_raw(&self, args: &[&str]) -> Result<Output> {
    Command::new("git")
      .current_dir(&self.path)
      .args(args)
      .output()
      .context("Failed to run git")
  }

  /// Whether a local branch exists
  pub fn branch_exists(&self, name: &str) -> Result<bool> {
    let output = self.git_raw(&["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)])?;
    Ok(output.status.success())
  }

  /// Current sha of main on the bare origin
  pub fn origin_main_sha(&self) -> Result<String> {
    let output = run("git", &self.origin, &["rev-parse", "main"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Read a file relative to the work tree
  pub fn read(&self, rel: &str) -> Result<String> {
    fs::read_to_string(self.path.join(rel)).with_context(|| format!("Failed to read {}", rel))
  }

  /// Whether a path exists relative to the work tree
  pub fn exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }

  /// Run relcut, returning the raw output whatever the exit status
  pub fn relcut(&self, args: &[&str]) -> Result<Output> {
    let bin = env!("CARGO_BIN_EXE_relcut");
    Command::new(bin)
      .current_dir(&self.path)
      .args(args)
      .output()
      .context("Failed to run relcut")
  }

  /// Run relcut, failing the test with full output if it exits non-zero
  pub fn relcut_ok(&self, args: &[&str]) -> Result<Output> {
    let output = self.relcut(args)?;

    if !output.status.success() {
      let stdout = String::from_utf8_lossy(&output.stdout);
      let stderr = String::from_utf8_lossy(&output.stderr);
      anyhow::bail!(
        "relcut {} failed\nstdout: {}\nstderr: {}",
        args.join(" "),
        stdout,
        stderr
      );
    }

    Ok(output)
  }
}

/// Write relcut.toml pointing at the given signing program
fn write_config(work_tree: &Path, signer: &Path) -> Result<()> {
  fs::write(
    work_tree.join("relcut.toml"),
    format!(
      r#"[project]
name = "demo"
repo_url = "https://example.org/demo"

[signing]
program = "{}"
"#,
      signer.display()
    ),
  )?;
  Ok(())
}

/// Write an executable shell script standing in for the signing program
fn write_signer_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
  let script = dir.join(name);
  fs::write(&script, body)?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(&script)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms)?;
  }

  Ok(script)
}

/// Run a command in a directory, bailing with stderr on failure
pub fn run(program: &str, cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new(program)
    .current_dir(cwd)
    .args(args)
    .output()
    .with_context(|| format!("Failed to run {}", program))?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("{} {} failed: {}", program, args.join(" "), stderr);
  }

  Ok(output)
}

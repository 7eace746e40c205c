//! Manual-recovery guidance for interrupted runs
//!
//! Armed when the first repository mutation lands, disarmed immediately
//! before a successful exit. While armed, any exit path, error return or
//! panic unwind alike, prints the commands that undo the local mutation. This
//! is advisory only: no automatic state restoration is attempted.

/// Guard that prints rollback instructions unless disarmed
pub struct RollbackGuard {
  main_branch: String,
  start_commit: String,
  rc_tag: String,
  staging_branch: String,
  armed: bool,
}

impl RollbackGuard {
  /// Arm the guard with everything the operator needs to undo the run
  pub fn arm(main_branch: &str, start_commit: &str, rc_tag: &str, staging_branch: &str) -> Self {
    Self {
      main_branch: main_branch.to_string(),
      start_commit: start_commit.to_string(),
      rc_tag: rc_tag.to_string(),
      staging_branch: staging_branch.to_string(),
      armed: true,
    }
  }

  /// Disarm after the run completed successfully
  pub fn disarm(&mut self) {
    self.armed = false;
  }

  /// The recovery instructions, as printed on a failure exit
  pub fn instructions(&self) -> String {
    let mut text = String::new();
    text.push_str("⚠️  The run did not complete; local repository state was modified.\n");
    text.push_str("To restore the previous state manually:\n\n");
    text.push_str(&format!("  git checkout {}\n", self.main_branch));
    text.push_str(&format!("  git reset --hard {}\n", self.start_commit));
    text.push_str(&format!("  git tag -d {}          # if the tag was created\n", self.rc_tag));
    text.push_str(&format!("  git branch -D {}    # if the branch was created\n", self.staging_branch));
    text
  }
}

impl Drop for RollbackGuard {
  fn drop(&mut self) {
    if self.armed {
      eprintln!("\n{}", self.instructions());
    }
  }
}

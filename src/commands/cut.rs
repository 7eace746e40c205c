//! The cut command: the whole candidate workflow, start to finish
//!
//! Strictly sequential. Everything before the changelog commit is
//! read-only; from that commit until the final success message a
//! [`RollbackGuard`] is armed so an aborted run always tells the operator
//! how to undo the local mutation.

use crate::core::context::ReleaseContext;
use crate::core::error::CutResult;
use crate::release::artifact;
use crate::release::announce;
use crate::release::changelog::ChangelogEntry;
use crate::release::plan::{Level, ReleasePlan};
use crate::release::preflight;
use crate::release::publish;
use crate::release::rollback::RollbackGuard;
use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

/// Run the full release-candidate workflow
///
/// `publish=false` (the default) is a dry run: local commits, the staging
/// branch and the artifact set are produced, but nothing leaves the
/// machine. `json=true` prints the computed plan and exits before any
/// mutation.
pub fn run_cut(level: Level, rc_number: u32, set_version: Option<String>, publish: bool, json: bool) -> CutResult<()> {
  let invocation_dir = env::current_dir()?;
  let ctx = ReleaseContext::build(&invocation_dir)?;

  if !json {
    println!("🔎 Checking release preconditions");
  }
  preflight::check(&ctx)?;

  let marker = fs::read_to_string(ctx.marker_path())?;
  let plan = ReleasePlan::compute(
    &marker,
    set_version.as_deref(),
    level,
    rc_number,
    &ctx.config.project.name,
  )?;
  preflight::ensure_tags_absent(&ctx, &plan)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
    return Ok(());
  }

  print_plan(&plan, publish);

  // Repository mutation begins here; arm the advisor first
  let mut guard = RollbackGuard::arm(
    &ctx.config.repo.main_branch,
    &ctx.start_commit,
    &plan.rc_tag,
    &plan.rc_version,
  );

  let today = Utc::now().format("%Y-%m-%d").to_string();
  let entry = ChangelogEntry::collect(&ctx.git, &plan, &ctx.config.project.name, &today)?;
  entry.prepend_to(&ctx.changelog_path(), &ctx.config.project.name)?;
  ctx.git.commit_file(
    Path::new(&ctx.config.repo.changelog_file),
    &format!("Updated {} for {}.", ctx.config.repo.changelog_file, plan.release_version),
  )?;
  println!("   Committed changelog for {}", plan.release_version);

  // The main line advances to the next snapshot before the artifact is
  // built; an abort after this point leaves it diverged until the operator
  // follows the rollback instructions.
  fs::write(ctx.marker_path(), format!("{}\n", plan.next_snapshot))?;
  ctx.git.commit_file(
    Path::new(&ctx.config.repo.marker_file),
    &format!("Updated version to {}.", plan.next_snapshot),
  )?;
  println!("   Advanced {} to {}", ctx.config.repo.main_branch, plan.next_snapshot);

  ctx.git.create_and_checkout_branch(&plan.rc_version)?;
  fs::write(ctx.marker_path(), format!("{}\n", plan.release_version))?;
  ctx.git.commit_file(
    Path::new(&ctx.config.repo.marker_file),
    &format!("Updated version to {}.", plan.release_version),
  )?;
  println!("   Created staging branch {}", plan.rc_version);

  let staging_head = ctx.git.head_commit()?;

  println!("📦 Building artifacts");
  let artifacts = artifact::build(&ctx, &plan)?;

  if publish {
    publish::run(&ctx, &plan, &artifacts, &staging_head)?;
  } else {
    println!("🔍 Dry run: skipping distribution upload and tag push");
    ctx.git.checkout(&ctx.original_branch)?;
  }

  guard.disarm();

  println!();
  println!("{}", announce::compose(&ctx.config, &plan, &staging_head, Utc::now()));
  println!("✅ Release candidate {} ready", plan.rc_version);

  Ok(())
}

fn print_plan(plan: &ReleasePlan, publish: bool) {
  println!("📦 Release candidate plan");
  println!("   Release version:  {}", plan.release_version);
  println!("   Next snapshot:    {}", plan.next_snapshot);
  println!("   Candidate:        {}", plan.rc_version);
  println!("   Release tag:      {}", plan.release_tag);
  println!("   Candidate tag:    {}", plan.rc_tag);
  println!("   Mode:             {}", if publish { "publish" } else { "dry run" });
  println!();
}

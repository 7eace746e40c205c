//! Publishing a cut candidate
//!
//! Network-mutating steps, only reached with `--publish`: upload the
//! artifact set to the distribution store, push the signed candidate tag,
//! and record the post-release main line under a unique remote ref. The
//! shared main line is never pushed to directly; concurrent pushes from
//! other operators must not race a release.

use crate::core::config::CutConfig;
use crate::core::context::ReleaseContext;
use crate::core::dist::DistStore;
use crate::core::error::CutResult;
use crate::release::artifact::ArtifactSet;
use crate::release::plan::ReleasePlan;

/// Remote refspec recording the main line as it stood after the cut
pub fn after_release_refspec(main_branch: &str, rc_tag: &str) -> String {
  format!("{0}:{0}-after-{1}", main_branch, rc_tag)
}

/// Publish the candidate: distribution store, signed tag, post-release ref
///
/// `staging_head` is the commit the candidate tag points at. Ends with the
/// main line checked out.
pub fn run(ctx: &ReleaseContext, plan: &ReleasePlan, artifacts: &ArtifactSet, staging_head: &str) -> CutResult<()> {
  let dist_url = CutConfig::require(ctx.config.dist.url.as_deref(), "dist.url", "publishing")?;
  let remote = &ctx.config.repo.remote;
  let main_branch = &ctx.config.repo.main_branch;

  println!("📤 Publishing {} to {}", plan.rc_version, dist_url);

  let store = DistStore::new(&dist_url);
  store.create_directory(
    &plan.rc_version,
    &format!("Creating distribution directory for {}.", plan.rc_version),
  )?;
  store.publish_files(
    &plan.rc_version,
    &artifacts.all_files(),
    &ctx.output_dir(),
    &format!("Adding {} release artifacts.", plan.rc_version),
  )?;
  println!("   Uploaded {} files", artifacts.all_files().len());

  ctx.git.create_signed_tag(
    &plan.rc_tag,
    staging_head,
    ctx.config.signing.identity.as_deref(),
    &format!("Tagging release candidate {}.", plan.rc_version),
  )?;
  ctx.git.push(remote, &plan.rc_tag)?;
  println!("   Pushed signed tag {}", plan.rc_tag);

  ctx.git.checkout(main_branch)?;
  let refspec = after_release_refspec(main_branch, &plan.rc_tag);
  ctx.git.push(remote, &refspec)?;
  println!("   Pushed {}", refspec);

  Ok(())
}

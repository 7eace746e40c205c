//! Release preconditions, checked before any mutation
//!
//! Ordered exactly as the failure should read to an operator: refresh the
//! remote, demand a clean tree on the main line, then demand a releasable
//! marker. Tag collisions are checked separately once the plan exists,
//! still ahead of the first commit.

use crate::core::context::ReleaseContext;
use crate::core::error::{CutError, CutResult, PreconditionError};
use crate::release::plan::{MarkerVersion, ReleasePlan};
use std::fs;

/// Validate the repository state for cutting a candidate
pub fn check(ctx: &ReleaseContext) -> CutResult<()> {
  ctx.git.fetch(&ctx.config.repo.remote)?;

  if !ctx.git.is_clean()? {
    return Err(CutError::Precondition(PreconditionError::DirtyWorkTree));
  }

  let branch = ctx.git.current_branch()?;
  if branch != ctx.config.repo.main_branch {
    return Err(CutError::Precondition(PreconditionError::WrongBranch {
      expected: ctx.config.repo.main_branch.clone(),
      actual: branch,
    }));
  }

  let marker = ctx.marker_path();
  if !marker.exists() {
    return Err(CutError::Precondition(PreconditionError::MarkerMissing { path: marker }));
  }

  let contents = fs::read_to_string(&marker)?;
  let version = MarkerVersion::parse(&contents)?;
  if !version.snapshot {
    return Err(CutError::Precondition(PreconditionError::NotASnapshot {
      found: version.to_string(),
    }));
  }

  Ok(())
}

/// Refuse to overwrite a prior release or candidate
pub fn ensure_tags_absent(ctx: &ReleaseContext, plan: &ReleasePlan) -> CutResult<()> {
  for tag in [&plan.release_tag, &plan.rc_tag] {
    if ctx.git.tag_exists(tag)? {
      return Err(CutError::Precondition(PreconditionError::TagExists { tag: tag.clone() }));
    }
  }

  Ok(())
}

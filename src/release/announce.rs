//! Vote announcement template
//!
//! Pure formatting, produced in dry runs and publish runs alike. The
//! generation instant is a parameter so the 3-day vote window is a testable
//! property rather than a side effect of the clock.

use crate::core::config::CutConfig;
use crate::release::plan::ReleasePlan;
use chrono::{DateTime, Duration, Utc};

/// Days a release vote stays open
const VOTE_WINDOW_DAYS: i64 = 3;

/// Deadline for the vote, relative to when the announcement is composed
pub fn vote_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
  now + Duration::days(VOTE_WINDOW_DAYS)
}

/// Compose the vote announcement for a cut candidate
///
/// `commit` is the staging branch head the candidate tag points at.
pub fn compose(config: &CutConfig, plan: &ReleasePlan, commit: &str, now: DateTime<Utc>) -> String {
  let name = &config.project.name;
  let repo_url = config.project.repo_url.as_deref().unwrap_or("");
  let artifact_base = match &config.dist.url {
    Some(url) => format!("{}/{}", url.trim_end_matches('/'), plan.rc_version),
    None => config.artifact.output_dir.display().to_string(),
  };

  let archive = format!("{}/{}.tar.gz", artifact_base, plan.release_tag);
  let deadline = vote_deadline(now).format("%a %b %d %H:%M:%S UTC %Y");

  format!(
    "To: {list}\n\
     Subject: [VOTE] Release {name} {version} (rc{rc})\n\
     \n\
     Hi all,\n\
     \n\
     Please vote on releasing the following candidate as {name} {version}.\n\
     \n\
     {version} includes the following changes:\n\
     {repo_url}/blob/{release_tag}/{changelog}\n\
     \n\
     The candidate for {name} {version} release is available at:\n\
     {archive}\n\
     \n\
     The tag to be voted on is {rc_tag} (commit {commit}):\n\
     {repo_url}/tree/{rc_tag}\n\
     \n\
     The archive signature:\n\
     {archive}.asc\n\
     \n\
     The checksums:\n\
     {archive}.sha256\n\
     {archive}.sha512\n\
     \n\
     Please vote on releasing this package as {name} {version}!\n\
     \n\
     The vote is open until {deadline} and passes if a majority of at\n\
     least 3 +1 votes are cast.\n\
     \n\
     [ ] +1 Release this package as {name} {version}\n\
     [ ] -1 Do not release this package because ...\n",
    list = config.announce.list,
    name = name,
    version = plan.release_version,
    rc = plan.rc_number,
    repo_url = repo_url,
    release_tag = plan.release_tag,
    changelog = config.repo.changelog_file,
    archive = archive,
    rc_tag = plan.rc_tag,
    commit = commit,
    deadline = deadline,
  )
}

//! Git operations via the system git binary
//!
//! All repository access shells out to `git` with an isolated environment.
//! `system_git` holds the repository handle and command plumbing;
//! `system_git_ops` adds the release-workflow operations (fetch, status,
//! branches, tags, archive, push).

mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

//! The release-candidate workflow, step by step
//!
//! - **plan**: version math: marker parsing, increment levels, derived names
//! - **preflight**: preconditions checked before any mutation
//! - **changelog**: changelog generation and file update
//! - **artifact**: archive, detached signature, digest sidecars
//! - **publish**: distribution store upload, signed tag, post-release ref
//! - **announce**: the vote announcement template
//! - **rollback**: manual-recovery guidance for interrupted runs

pub mod announce;
pub mod artifact;
pub mod changelog;
pub mod plan;
pub mod preflight;
pub mod publish;
pub mod rollback;

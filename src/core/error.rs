//! Error types for relcut with contextual messages
//!
//! A single categorized error type covers the whole run: configuration
//! problems, failed preconditions, git failures, and failures of other
//! invoked tools (gpg, svn). Errors carry a help suggestion where a
//! concrete next step exists. Every failure exits the process with code 1;
//! help and successful dry runs exit 0.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for relcut
#[derive(Debug)]
pub enum CutError {
  /// Configuration errors (relcut.toml)
  Config(ConfigError),

  /// Failed release preconditions (dirty tree, wrong branch, bad marker)
  Precondition(PreconditionError),

  /// Git operation errors
  Git(GitError),

  /// Failures of non-git external tools (gpg, svn)
  Tool(ToolError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl CutError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CutError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CutError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      CutError::Message { message, context, help } => CutError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CutError::Config(e) => e.help_message(),
      CutError::Precondition(e) => e.help_message(),
      CutError::Git(e) => e.help_message(),
      CutError::Tool(e) => e.help_message(),
      CutError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for CutError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CutError::Config(e) => write!(f, "{}", e),
      CutError::Precondition(e) => write!(f, "{}", e),
      CutError::Git(e) => write!(f, "{}", e),
      CutError::Tool(e) => write!(f, "{}", e),
      CutError::Io(e) => write!(f, "I/O error: {}", e),
      CutError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for CutError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CutError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for CutError {
  fn from(err: io::Error) -> Self {
    CutError::Io(err)
  }
}

impl From<String> for CutError {
  fn from(msg: String) -> Self {
    CutError::message(msg)
  }
}

impl From<&str> for CutError {
  fn from(msg: &str) -> Self {
    CutError::message(msg)
  }
}

impl From<toml_edit::TomlError> for CutError {
  fn from(err: toml_edit::TomlError) -> Self {
    CutError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for CutError {
  fn from(err: toml_edit::de::Error) -> Self {
    CutError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for CutError {
  fn from(err: serde_json::Error) -> Self {
    CutError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for CutError {
  fn from(err: semver::Error) -> Self {
    CutError::message(format!("Version parse error: {}", err))
  }
}

impl From<std::str::Utf8Error> for CutError {
  fn from(err: std::str::Utf8Error) -> Self {
    CutError::message(format!("UTF-8 error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for CutError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    CutError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// relcut.toml exists but cannot be parsed or is invalid
  Invalid { path: PathBuf, reason: String },

  /// A field required for the requested mode is missing
  MissingField { field: String, needed_for: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { path, .. } => Some(format!(
        "Fix or remove {}; every key has a default, the file is optional.",
        path.display()
      )),
      ConfigError::MissingField { field, .. } => {
        Some(format!("Set `{}` in relcut.toml.", field))
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field, needed_for } => {
        write!(f, "Missing configuration field `{}` (required for {})", field, needed_for)
      }
    }
  }
}

/// Failed release preconditions
///
/// All of these abort the run before any repository mutation.
#[derive(Debug)]
pub enum PreconditionError {
  /// Working tree has uncommitted changes
  DirtyWorkTree,

  /// Current branch is not the configured main line
  WrongBranch { expected: String, actual: String },

  /// Version marker file not found at the repository root
  MarkerMissing { path: PathBuf },

  /// Marker version does not carry the snapshot suffix
  NotASnapshot { found: String },

  /// A derived tag already exists in the repository
  TagExists { tag: String },
}

impl PreconditionError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreconditionError::DirtyWorkTree => {
        Some("Commit or stash your changes, then re-run.".to_string())
      }
      PreconditionError::WrongBranch { expected, .. } => {
        Some(format!("Run `git checkout {}` first.", expected))
      }
      PreconditionError::MarkerMissing { path } => Some(format!(
        "Create {} containing the current snapshot version (e.g. 1.0.0-SNAPSHOT).",
        path.display()
      )),
      PreconditionError::NotASnapshot { .. } => {
        Some("Only snapshot versions can be released; the marker must end in -SNAPSHOT.".to_string())
      }
      PreconditionError::TagExists { tag } => Some(format!(
        "This version was already released. Delete the tag with `git tag -d {}` only if you are certain it is stale.",
        tag
      )),
    }
  }
}

impl fmt::Display for PreconditionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreconditionError::DirtyWorkTree => {
        write!(f, "Working tree has uncommitted changes")
      }
      PreconditionError::WrongBranch { expected, actual } => {
        write!(f, "Releases are cut from '{}' but the current branch is '{}'", expected, actual)
      }
      PreconditionError::MarkerMissing { path } => {
        write!(f, "Version marker file not found: {}", path.display())
      }
      PreconditionError::NotASnapshot { found } => {
        write!(f, "Marker version '{}' is not a snapshot, nothing to release", found)
      }
      PreconditionError::TagExists { tag } => {
        write!(f, "Tag '{}' already exists", tag)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Fetch and retry from a fresh clone.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key permissions and repository access.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run relcut from inside a git repository clone (looked at: {}).",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason)
      }
    }
  }
}

/// Failures of invoked non-git tools
#[derive(Debug)]
pub enum ToolError {
  /// The tool binary could not be found on PATH
  Missing { program: String },

  /// The tool ran and returned a non-zero exit status
  Failed { program: String, stderr: String },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Missing { program } => Some(format!(
        "Install `{}` or point relcut at an alternative via relcut.toml.",
        program
      )),
      ToolError::Failed { program, .. } if program.contains("gpg") => {
        Some("Check that the signing key exists: `gpg --list-secret-keys`.".to_string())
      }
      ToolError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Missing { program } => {
        write!(f, "Required tool not found on PATH: {}", program)
      }
      ToolError::Failed { program, stderr } => {
        write!(f, "{} failed:\n{}", program, stderr)
      }
    }
  }
}

/// Result type alias for relcut
pub type CutResult<T> = Result<T, CutError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> CutResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> CutResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<CutError>,
{
  fn context(self, ctx: impl Into<String>) -> CutResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> CutResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &CutError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

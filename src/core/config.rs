//! relcut configuration (relcut.toml) parsing and defaults
//!
//! Searched in order: relcut.toml, .relcut.toml, .config/relcut.toml.
//! Every key has a default, so the file is entirely optional; a bare
//! repository with a `VERSION` marker on `main` releases out of the box.

use crate::core::error::{ConfigError, CutError, CutResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for relcut
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CutConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub repo: RepoConfig,
  #[serde(default)]
  pub artifact: ArtifactConfig,
  #[serde(default)]
  pub signing: SigningConfig,
  #[serde(default)]
  pub dist: DistConfig,
  #[serde(default)]
  pub announce: AnnounceConfig,
}

/// Project identity, used for tag names and announcement links
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
  /// Tag prefix and display name (default: repository directory name)
  #[serde(default)]
  pub name: String,

  /// Base URL of the repository browser, used in the vote announcement
  #[serde(default)]
  pub repo_url: Option<String>,
}

/// Repository layout and branch conventions
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
  /// The main development line releases are cut from
  #[serde(default = "default_main_branch")]
  pub main_branch: String,

  /// Remote that receives the signed tag and the post-release ref
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Version marker file at the repository root
  #[serde(default = "default_marker_file")]
  pub marker_file: String,

  /// Changelog file updated on the main line before the version bump
  #[serde(default = "default_changelog_file")]
  pub changelog_file: String,
}

fn default_main_branch() -> String {
  "main".to_string()
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_marker_file() -> String {
  "VERSION".to_string()
}

fn default_changelog_file() -> String {
  "CHANGELOG.md".to_string()
}

impl Default for RepoConfig {
  fn default() -> Self {
    Self {
      main_branch: default_main_branch(),
      remote: default_remote(),
      marker_file: default_marker_file(),
      changelog_file: default_changelog_file(),
    }
  }
}

/// Where the archive and its sidecar files are written
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
  /// Output directory for the tarball, signature and digests
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("dist")
}

impl Default for ArtifactConfig {
  fn default() -> Self {
    Self {
      output_dir: default_output_dir(),
    }
  }
}

/// Detached-signature settings
#[derive(Debug, Clone, Deserialize)]
pub struct SigningConfig {
  /// Key id or email passed as the local user; the program's default key
  /// is used when unset
  #[serde(default)]
  pub identity: Option<String>,

  /// Signing program, overridable the same way git's `gpg.program` is
  #[serde(default = "default_signing_program")]
  pub program: String,
}

fn default_signing_program() -> String {
  "gpg".to_string()
}

impl Default for SigningConfig {
  fn default() -> Self {
    Self {
      identity: None,
      program: default_signing_program(),
    }
  }
}

/// Distribution store reachable via svn
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistConfig {
  /// Store URL; required only when publishing
  #[serde(default)]
  pub url: Option<String>,
}

/// Vote announcement settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnnounceConfig {
  /// Mailing list the vote template is addressed to
  #[serde(default = "default_list")]
  pub list: String,
}

fn default_list() -> String {
  "dev@example.org".to_string()
}

impl Default for AnnounceConfig {
  fn default() -> Self {
    Self {
      list: default_list(),
    }
  }
}

impl CutConfig {
  /// Find config file in search order: relcut.toml, .relcut.toml, .config/relcut.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [
      root.join("relcut.toml"),
      root.join(".relcut.toml"),
      root.join(".config").join("relcut.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  ///
  /// An unset project name is filled in from the repository directory name,
  /// keeping tag names meaningful without any configuration.
  pub fn load_or_default(root: &Path) -> CutResult<Self> {
    let mut config = match Self::find_config_path(root) {
      Some(config_path) => {
        let content = fs::read_to_string(&config_path)
          .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        toml_edit::de::from_str::<CutConfig>(&content).map_err(|e| {
          CutError::Config(ConfigError::Invalid {
            path: config_path.clone(),
            reason: e.to_string(),
          })
        })?
      }
      None => CutConfig::default(),
    };

    if config.project.name.is_empty() {
      config.project.name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "release".to_string());
    }

    Ok(config)
  }

  /// Require a field that only some modes need, with a pointer to the key
  pub fn require(value: Option<&str>, field: &str, needed_for: &str) -> CutResult<String> {
    value.map(str::to_string).ok_or_else(|| {
      CutError::Config(ConfigError::MissingField {
        field: field.to_string(),
        needed_for: needed_for.to_string(),
      })
    })
  }
}

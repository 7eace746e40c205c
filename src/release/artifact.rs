//! Distribution artifact: archive, signature, checksums
//!
//! `git archive` produces the tarball from the staging branch head. The
//! signing and digest steps then run inside the output directory under a
//! [`WorkdirGuard`], so the signature and the digest lines reference bare
//! file names the way `sha256sum -c` expects, and the working directory is
//! restored on every exit path.

use crate::core::context::{ReleaseContext, WorkdirGuard};
use crate::core::error::{CutError, CutResult, ToolError};
use crate::core::config::SigningConfig;
use crate::release::plan::ReleasePlan;
use crate::ui::progress::HashProgress;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

const DIGEST_CHUNK: usize = 64 * 1024;

/// The full artifact set produced for one candidate
#[derive(Debug)]
pub struct ArtifactSet {
  /// The source tarball, named by the release tag
  pub archive: PathBuf,
  /// Detached armor signature (`.asc`)
  pub signature: PathBuf,
  /// Digest sidecars (`.md5`, `.sha1`, `.sha256`, `.sha512`)
  pub digests: Vec<PathBuf>,
}

impl ArtifactSet {
  /// Everything that gets published, archive first
  pub fn all_files(&self) -> Vec<PathBuf> {
    let mut files = vec![self.archive.clone(), self.signature.clone()];
    files.extend(self.digests.iter().cloned());
    files
  }
}

/// Build the artifact set for the staging branch head
///
/// Must be called with the staging branch checked out; the archive is
/// taken from HEAD so it matches the release-version commit exactly.
pub fn build(ctx: &ReleaseContext, plan: &ReleasePlan) -> CutResult<ArtifactSet> {
  let output_dir = ctx.output_dir();
  fs::create_dir_all(&output_dir)?;

  let archive_name = format!("{}.tar.gz", plan.release_tag);
  let archive_path = output_dir.join(&archive_name);

  println!("   Archiving {} to {}", plan.rc_version, archive_path.display());
  ctx.git.archive("HEAD", &format!("{}/", plan.release_tag), &archive_path)?;

  let _cwd = WorkdirGuard::enter(&output_dir)?;

  println!("   Signing {}", archive_name);
  let signature = sign_archive(&ctx.config.signing, &archive_name)?;

  let digests = write_digest_files(Path::new(&archive_name))?;

  Ok(ArtifactSet {
    archive: archive_path,
    signature: output_dir.join(signature),
    digests: digests.into_iter().map(|d| output_dir.join(d)).collect(),
  })
}

/// Produce a detached armor signature next to the archive
fn sign_archive(signing: &SigningConfig, archive_name: &str) -> CutResult<PathBuf> {
  let signature_name = format!("{}.asc", archive_name);

  let mut cmd = Command::new(&signing.program);
  cmd.args(["--armor", "--detach-sign", "--yes", "--output", &signature_name]);
  if let Some(identity) = &signing.identity {
    cmd.args(["--local-user", identity]);
  }
  cmd.arg(archive_name);

  let output = cmd.output().map_err(|e| match e.kind() {
    io::ErrorKind::NotFound => CutError::Tool(ToolError::Missing {
      program: signing.program.clone(),
    }),
    _ => CutError::Io(e),
  })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(CutError::Tool(ToolError::Failed {
      program: signing.program.clone(),
      stderr: stderr.trim().to_string(),
    }));
  }

  Ok(PathBuf::from(signature_name))
}

/// Write the four digest sidecars for an archive
///
/// One streaming pass feeds all four hashers. Sidecar lines use the
/// `sha*sum` format (`<hex>  <name>`) with the bare archive name, so the
/// files verify with `sha256sum -c` from the download directory.
fn write_digest_files(archive: &Path) -> CutResult<Vec<PathBuf>> {
  let archive_name = archive
    .file_name()
    .ok_or_else(|| CutError::message(format!("Archive path has no file name: {}", archive.display())))?
    .to_string_lossy()
    .into_owned();

  let file = fs::File::open(archive)?;
  let total = file.metadata()?.len() as usize;
  let mut reader = io::BufReader::new(file);
  let mut progress = HashProgress::new(total, format!("Hashing {}", archive_name));

  let mut md5 = Md5::new();
  let mut sha1 = Sha1::new();
  let mut sha256 = Sha256::new();
  let mut sha512 = Sha512::new();

  let mut buffer = [0u8; DIGEST_CHUNK];
  loop {
    let read = reader.read(&mut buffer)?;
    if read == 0 {
      break;
    }
    md5.update(&buffer[..read]);
    sha1.update(&buffer[..read]);
    sha256.update(&buffer[..read]);
    sha512.update(&buffer[..read]);
    progress.advance(read);
  }

  let digests = [
    ("md5", format!("{:x}", md5.finalize())),
    ("sha1", format!("{:x}", sha1.finalize())),
    ("sha256", format!("{:x}", sha256.finalize())),
    ("sha512", format!("{:x}", sha512.finalize())),
  ];

  let mut paths = Vec::with_capacity(digests.len());
  for (extension, hex) in digests {
    let sidecar = PathBuf::from(format!("{}.{}", archive.display(), extension));
    fs::write(&sidecar, format!("{}  {}\n", hex, archive_name))?;
    paths.push(sidecar);
  }

  Ok(paths)
}

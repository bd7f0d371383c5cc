//! Invocation of the external binary-patch generator (`hdiffz`).
//!
//! The generator is a collaborator with a simple contract: given an old
//! file, a new file and an output path it either produces a delta file or
//! fails with diagnostics on stderr. Failures are recovered per candidate
//! by the caller, never retried here.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Compression arguments passed to every invocation.
const HDIFFZ_ARGS: [&str; 2] = ["-f", "-c-lzma2-9-256m"];

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to run patch generator: {0}")]
    Io(#[from] std::io::Error),

    #[error("patch generator exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
}

/// Wrapper around the `hdiffz` executable.
#[derive(Debug, Clone)]
pub struct PatchService {
    hdiffz: Utf8PathBuf,
}

impl PatchService {
    pub fn new<P: Into<Utf8PathBuf>>(hdiffz: P) -> Self {
        Self { hdiffz: hdiffz.into() }
    }

    /// Generate a delta from `old_file` to `new_file` at `patch_file`.
    /// The parent directory is created first; `hdiffz` will not do it.
    pub async fn generate(
        &self,
        old_file: &Utf8Path,
        new_file: &Utf8Path,
        patch_file: &Utf8Path,
    ) -> Result<(), PatchError> {
        if let Some(parent) = patch_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::debug!("Generating patch: {old_file} + {new_file} -> {patch_file}");

        let output = Command::new(self.hdiffz.as_str())
            .args(HDIFFZ_ARGS)
            .arg(old_file.as_str())
            .arg(new_file.as_str())
            .arg(patch_file.as_str())
            .output()
            .await?;

        if !output.status.success() {
            return Err(PatchError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

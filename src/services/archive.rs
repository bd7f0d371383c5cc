//! Invocation of the external archiver (`7z`) over a finalized staging
//! folder. The engine's only obligation is that the folder is fully
//! populated before this runs; compression itself is the collaborator's.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Archiver arguments matching the published update-package format.
const SEVEN_ZIP_ARGS: [&str; 8] =
    ["a", "-t7z", "-mx=9", "-m0=LZMA2", "-md=256m", "-mfb=64", "-ms=16g", "-mmt=on"];

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to run archiver: {0}")]
    Io(#[from] std::io::Error),

    #[error("archiver exited with code {code}")]
    Failed { code: i32 },
}

/// Wrapper around the `7z` executable.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    seven_zip: Utf8PathBuf,
}

impl ArchiveService {
    pub fn new<P: Into<Utf8PathBuf>>(seven_zip: P) -> Self {
        Self { seven_zip: seven_zip.into() }
    }

    /// Compress the contents of `folder` into `../<archive_name>` relative
    /// to it. The archiver runs with `folder` as working directory so the
    /// archive contains the folder's contents at the top level.
    pub async fn compress(
        &self,
        folder: &Utf8Path,
        archive_name: &str,
    ) -> Result<(), ArchiveError> {
        let output = Command::new(self.seven_zip.as_str())
            .args(SEVEN_ZIP_ARGS)
            .arg(format!("../{archive_name}"))
            .arg("*")
            .current_dir(folder)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ArchiveError::Failed { code: output.status.code().unwrap_or(-1) });
        }

        Ok(())
    }
}

//! Manifest generation: the deleted-file list and the patch-candidate list.
//!
//! The deleted-file ordering (path depth ascending, then case-insensitive
//! file name) is a published contract consumed by downstream deployment
//! tooling and must be reproduced exactly.

use std::fs;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

pub const DELETED_LIST_NAME: &str = "deletefiles.txt";
pub const CANDIDATE_LIST_NAME: &str = "hdifffiles.txt";

/// One patch-candidate record; serialized as a JSON object per line with
/// the category-qualified remote path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCandidate {
    #[serde(rename = "remoteName")]
    pub remote_name: String,
}

fn depth(path: &str) -> usize {
    path.chars().filter(|&c| c == '/').count()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Write `deletefiles.txt` into `output_dir`, sorted by depth then
/// case-insensitive file name. Returns `false` without touching the
/// filesystem when `entries` is empty; an empty category manifest is a
/// no-op, not an error.
pub fn write_deleted_list(entries: &[String], output_dir: &Utf8Path) -> Result<bool> {
    if entries.is_empty() {
        return Ok(false);
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        depth(a)
            .cmp(&depth(b))
            .then_with(|| file_name(a).to_lowercase().cmp(&file_name(b).to_lowercase()))
    });

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {output_dir}"))?;

    let out_path = output_dir.join(DELETED_LIST_NAME);
    let mut contents = sorted.join("\n");
    contents.push('\n');
    fs::write(&out_path, contents)
        .with_context(|| format!("Failed to write deleted-file list: {out_path}"))?;

    tracing::info!("Created {out_path} ({} files)", sorted.len());
    Ok(true)
}

/// Write `hdifffiles.txt` into `output_dir`, one JSON record per line in
/// discovery order. Returns `false` and writes nothing for empty input.
pub fn write_candidate_list(entries: &[PatchCandidate], output_dir: &Utf8Path) -> Result<bool> {
    if entries.is_empty() {
        return Ok(false);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {output_dir}"))?;

    let mut contents = String::new();
    for entry in entries {
        let line = serde_json::to_string(entry).context("Failed to serialize patch candidate")?;
        contents.push_str(&line);
        contents.push('\n');
    }

    let out_path = output_dir.join(CANDIDATE_LIST_NAME);
    fs::write(&out_path, contents)
        .with_context(|| format!("Failed to write patch-candidate list: {out_path}"))?;

    tracing::info!("Created {out_path} ({} entries)", entries.len());
    Ok(true)
}

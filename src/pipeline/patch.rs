//! Patch stage: scan each category's staging folder for `.pck` files and
//! turn every one with a resolvable old-side counterpart into a binary
//! delta, recording it in the category's `hdifffiles.txt`.
//!
//! Generator failures are recovered per candidate: the file stays staged
//! whole and drops out of the manifest. A candidate whose old counterpart
//! cannot be resolved ships whole by design.

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tokio::sync::Semaphore;

use crate::metrics::Metrics;
use crate::models::{Category, ConcurrencyMode, RunContext};
use crate::services::{PatchCandidate, PatchService, alias, manifest};

/// Run the patch stage over all enabled categories.
pub async fn run(ctx: &RunContext) -> Result<()> {
    let start = std::time::Instant::now();
    tracing::info!("Patch generation started");

    let service = PatchService::new(ctx.config.hdiffz_path.clone());
    for category in ctx.enabled_categories() {
        run_category(ctx, &service, category).await?;
    }

    tracing::info!("Patch generation completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

async fn run_category(ctx: &RunContext, service: &PatchService, category: Category) -> Result<()> {
    let staging_dir = ctx.output_dir(&category);
    if !staging_dir.is_dir() {
        tracing::debug!("No staging folder for {category}, skipping patch pass");
        return Ok(());
    }

    let files = discover_candidates(&staging_dir)?;
    let old_base = ctx.old_base();

    let mut candidates = Vec::new();
    match ctx.config.concurrency_mode() {
        ConcurrencyMode::Sequential => {
            for (staged, remote_name) in files {
                if let Some(candidate) =
                    process_single(&ctx.metrics, service, &old_base, &staged, &remote_name).await
                {
                    candidates.push(candidate);
                }
            }
        }
        ConcurrencyMode::Parallel => {
            // Bound concurrent generator subprocesses; manifest order stays
            // deterministic because results are collected in spawn order.
            let semaphore = Arc::new(Semaphore::new(ctx.config.max_threads));
            let mut handles = Vec::new();
            for (staged, remote_name) in files {
                let semaphore = Arc::clone(&semaphore);
                let metrics = Arc::clone(&ctx.metrics);
                let service = service.clone();
                let old_base = old_base.clone();
                handles.push(tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return None,
                    };
                    process_single(&metrics, &service, &old_base, &staged, &remote_name).await
                }));
            }
            for handle in handles {
                if let Some(candidate) = handle.await.context("Patch worker panicked")? {
                    candidates.push(candidate);
                }
            }
        }
    }

    if !manifest::write_candidate_list(&candidates, &staging_dir)? {
        tracing::info!("No patch candidates for {category}");
    }
    Ok(())
}

/// Enumerate the staged `.pck` files in deterministic walk order, paired
/// with their staging-relative remote names.
fn discover_candidates(staging_dir: &Utf8Path) -> Result<Vec<(Utf8PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(staging_dir).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to enumerate staging folder {staging_dir}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8Path::from_path(entry.path())
            .with_context(|| format!("Non-UTF-8 path under {staging_dir}"))?;
        if path.extension() != Some("pck") {
            continue;
        }
        let remote_name = path
            .strip_prefix(staging_dir)
            .with_context(|| format!("Path escaped staging folder {staging_dir}"))?
            .as_str()
            .replace('\\', "/");
        files.push((path.to_path_buf(), remote_name));
    }
    Ok(files)
}

/// Process one staged candidate. Returns the manifest record when the
/// candidate ends up patch-delivered, `None` when it ships whole or failed.
async fn process_single(
    metrics: &Metrics,
    service: &PatchService,
    old_base: &Utf8Path,
    staged: &Utf8Path,
    remote_name: &str,
) -> Option<PatchCandidate> {
    let Some(old_file) = alias::find_in(old_base, remote_name) else {
        tracing::info!("Skipping {remote_name}: not present in old version, ships whole");
        metrics.record_patch_skipped();
        return None;
    };

    let patch_file = Utf8PathBuf::from(format!("{staged}.hdiff"));
    if patch_file.is_file() {
        tracing::info!("Patch already exists: {patch_file}");
        return Some(PatchCandidate { remote_name: remote_name.to_string() });
    }

    match service.generate(&old_file, staged, &patch_file).await {
        Ok(()) => {
            match std::fs::remove_file(staged) {
                Ok(()) => tracing::info!("{patch_file} created, removed staged source"),
                Err(e) => tracing::error!("Failed to remove staged source {staged}: {e}"),
            }
            metrics.record_patch_created();
            Some(PatchCandidate { remote_name: remote_name.to_string() })
        }
        Err(e) => {
            tracing::error!("Patch generation failed for {remote_name}: {e}");
            metrics.record_patch_failed();
            None
        }
    }
}

//! Diff stage: forward-classify each category's new-version tree and stage
//! every Added or Modified file into the category output folder under its
//! new-side qualified path.

use anyhow::{Context, Result};
use camino::Utf8Path;

use crate::models::{AudioLanguage, Category, RunContext, join_rel};
use crate::services::{Classification, ScanDirection, TreeScan, classify_pair, classify_tree};

/// Build one category's staging folder.
pub fn run_category(ctx: &RunContext, category: Category) -> Result<()> {
    match category {
        Category::Game => game_diff(ctx),
        Category::Audio(lang) => audio_diff(ctx, lang),
    }
}

/// Copy one classified entry into the staging folder when it changed.
/// Returns true when the file was staged.
fn stage_changed(
    ctx: &RunContext,
    category: &Category,
    output_dir: &Utf8Path,
    result: &crate::services::ClassificationResult,
) -> Result<bool> {
    let folder = category.output_dir(&ctx.config.old_ver, &ctx.config.new_ver);

    match result.classification {
        Classification::Unchanged => {
            tracing::debug!("Unchanged file: {folder}/{}", result.qualified_path);
            ctx.metrics.record_file_unchanged();
            Ok(false)
        }
        Classification::Added | Classification::Modified => {
            let new_path = result
                .new_path
                .as_ref()
                .context("Changed entry is missing its new-side path")?;
            let out_path = join_rel(output_dir, &result.qualified_path);

            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create staging directory: {parent}"))?;
            }
            let bytes = std::fs::copy(new_path, &out_path)
                .with_context(|| format!("Failed to stage {new_path} -> {out_path}"))?;

            let reason = if result.classification == Classification::Added {
                "new file"
            } else {
                "hash mismatch"
            };
            tracing::info!("Staged {folder}/{} ({reason})", result.qualified_path);
            ctx.metrics.record_file_staged();
            ctx.metrics.record_bytes_staged(bytes);
            Ok(true)
        }
        Classification::Deleted => Ok(false),
    }
}

fn game_diff(ctx: &RunContext) -> Result<()> {
    let category = Category::Game;
    let old_base = ctx.old_base();
    let new_base = ctx.new_base();
    let output_dir = ctx.output_dir(&category);

    let scan = TreeScan {
        direction: ScanDirection::Forward,
        walk_root: &new_base,
        counterpart_base: &old_base,
        qualify_prefix: "",
        new_version: &ctx.config.new_ver,
        skip_audio_subtrees: true,
    };

    let mut staged = 0usize;
    for result in classify_tree(&scan)? {
        if stage_changed(ctx, &category, &output_dir, &result)? {
            staged += 1;
        }
    }

    report(ctx, &category, staged);
    Ok(())
}

fn audio_diff(ctx: &RunContext, lang: AudioLanguage) -> Result<()> {
    let category = Category::Audio(lang);
    let old_base = ctx.old_base();
    let new_base = ctx.new_base();
    let output_dir = ctx.output_dir(&category);

    let mut staged = 0usize;

    // The new version may not ship this language at all; that is a skip,
    // not an error.
    match crate::services::find_audio_dir(&new_base, lang.name) {
        None => {
            tracing::info!(
                "Skipping {}: no {} audio directory in {}",
                category.output_dir(&ctx.config.old_ver, &ctx.config.new_ver),
                lang.name,
                new_base
            );
            return Ok(());
        }
        Some(audio) => {
            let prefix = audio.variant.audio_rel(audio.data_dir, lang.name);
            let scan = TreeScan {
                direction: ScanDirection::Forward,
                walk_root: &audio.path,
                counterpart_base: &old_base,
                qualify_prefix: &prefix,
                new_version: &ctx.config.new_ver,
                skip_audio_subtrees: false,
            };

            for result in classify_tree(&scan)? {
                if stage_changed(ctx, &category, &output_dir, &result)? {
                    staged += 1;
                }
            }
        }
    }

    // The per-language package-version marker sits at the version root and
    // is staged at the output root, outside the audio subtree.
    let marker = lang.marker_file();
    if let Some(result) =
        classify_pair(&old_base.join(&marker), &new_base.join(&marker), &marker)?
    {
        if stage_changed(ctx, &category, &output_dir, &result)? {
            staged += 1;
        }
    }

    report(ctx, &category, staged);
    Ok(())
}

fn report(ctx: &RunContext, category: &Category, staged: usize) {
    let folder = category.output_dir(&ctx.config.old_ver, &ctx.config.new_ver);
    if staged > 0 {
        tracing::info!("Successfully built {folder} ({staged} files)");
    } else {
        tracing::info!("No changes for {folder}");
    }
}

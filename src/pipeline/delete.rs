//! Delete stage: backward-classify each category's old-version tree and
//! write the category's `deletefiles.txt`.
//!
//! Deletion candidates go through the same alias resolution as the forward
//! scan, so a file that merely moved between schema layouts is never listed
//! as deleted. Each category collects entries across both schema layouts and
//! writes one manifest.

use anyhow::Result;

use crate::models::{AudioLanguage, Category, GAME_DATA_DIRS, RunContext, SchemaVariant, join_rel};
use crate::services::{ScanDirection, TreeScan, classify_tree, manifest};

/// Build one category's deleted-file manifest.
pub fn run_category(ctx: &RunContext, category: Category) -> Result<()> {
    let deleted = match category {
        Category::Game => game_deleted(ctx)?,
        Category::Audio(lang) => audio_deleted(ctx, lang)?,
    };

    for _ in &deleted {
        ctx.metrics.record_file_deleted();
    }

    let output_dir = ctx.output_dir(&category);
    if !manifest::write_deleted_list(&deleted, &output_dir)? {
        tracing::info!("No deleted files for {category}");
    }
    Ok(())
}

fn game_deleted(ctx: &RunContext) -> Result<Vec<String>> {
    let old_base = ctx.old_base();
    let new_base = ctx.new_base();

    let scan = TreeScan {
        direction: ScanDirection::Backward,
        walk_root: &old_base,
        counterpart_base: &new_base,
        qualify_prefix: "",
        new_version: &ctx.config.new_ver,
        skip_audio_subtrees: true,
    };

    Ok(classify_tree(&scan)?.into_iter().map(|r| r.qualified_path).collect())
}

fn audio_deleted(ctx: &RunContext, lang: AudioLanguage) -> Result<Vec<String>> {
    let old_base = ctx.old_base();
    let new_base = ctx.new_base();
    let mut deleted = Vec::new();

    // The old install may carry this language under either layout (or, in
    // a broken tree, both); every old-side directory that exists is scanned.
    for data_dir in GAME_DATA_DIRS {
        for variant in SchemaVariant::ALL {
            let prefix = variant.audio_rel(data_dir, lang.name);
            let old_dir = join_rel(&old_base, &prefix);
            if !old_dir.is_dir() {
                continue;
            }

            let scan = TreeScan {
                direction: ScanDirection::Backward,
                walk_root: &old_dir,
                counterpart_base: &new_base,
                qualify_prefix: &prefix,
                new_version: &ctx.config.new_ver,
                skip_audio_subtrees: false,
            };
            deleted.extend(classify_tree(&scan)?.into_iter().map(|r| r.qualified_path));
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AUDIO_LANGUAGES, BuilderConfig, GAME_ROOT_DIRS, InstallRoot};
    use crate::services::DELETED_LIST_NAME;
    use camino::{Utf8Path, Utf8PathBuf};
    use std::fs;
    use tempfile::TempDir;

    fn test_context(dir: &TempDir) -> RunContext {
        let work_dir = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let root = InstallRoot { root_dir: GAME_ROOT_DIRS[0], data_dir: GAME_DATA_DIRS[0] };
        RunContext::new(BuilderConfig::default(), root, work_dir).unwrap()
    }

    fn write(base: &Utf8Path, rel: &str, contents: &[u8]) {
        let path = join_rel(base, rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_game_deleted_written_sorted() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);
        let old = ctx.old_base();
        fs::create_dir_all(ctx.new_base()).unwrap();

        write(&old, "GenshinImpact_Data/gone/deep.bin", b"x");
        write(&old, "toplevel.bin", b"y");

        run_category(&ctx, Category::Game).unwrap();

        let manifest = ctx.output_dir(&Category::Game).join(DELETED_LIST_NAME);
        let contents = fs::read_to_string(manifest).unwrap();
        assert_eq!(contents, "toplevel.bin\nGenshinImpact_Data/gone/deep.bin\n");
    }

    #[test]
    fn test_no_deletions_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);
        fs::create_dir_all(ctx.old_base()).unwrap();
        fs::create_dir_all(ctx.new_base()).unwrap();

        run_category(&ctx, Category::Game).unwrap();
        assert!(!ctx.output_dir(&Category::Game).exists());
    }

    #[test]
    fn test_audio_schema_migration_not_reported_deleted() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);
        let old = ctx.old_base();
        let new = ctx.new_base();
        let lang = AUDIO_LANGUAGES[1]; // Japanese

        // Moved between layouts with identical names; resolvable via alias.
        write(&old, "GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/kept.pck", b"x");
        write(
            &new,
            "GenshinImpact_Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Japanese/kept.pck",
            b"x",
        );
        // Genuinely gone.
        write(&old, "GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/gone.pck", b"y");

        run_category(&ctx, Category::Audio(lang)).unwrap();

        let manifest = ctx.output_dir(&Category::Audio(lang)).join(DELETED_LIST_NAME);
        let contents = fs::read_to_string(manifest).unwrap();
        assert_eq!(
            contents,
            "GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/gone.pck\n"
        );
    }

    #[test]
    fn test_audio_collects_across_both_layouts() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);
        let old = ctx.old_base();
        fs::create_dir_all(ctx.new_base()).unwrap();
        let lang = AUDIO_LANGUAGES[2]; // Korean

        write(&old, "GenshinImpact_Data/StreamingAssets/AudioAssets/Korean/a.pck", b"x");
        write(
            &old,
            "GenshinImpact_Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Korean/b.pck",
            b"y",
        );

        run_category(&ctx, Category::Audio(lang)).unwrap();

        let manifest = ctx.output_dir(&Category::Audio(lang)).join(DELETED_LIST_NAME);
        let contents = fs::read_to_string(manifest).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.ends_with("/Korean/a.pck")));
        assert!(lines.iter().any(|l| l.ends_with("/Korean/b.pck")));
    }
}

//! The change classifier: walks one version's tree and classifies every
//! entry against the other version via alias resolution and content hashing.
//!
//! This is the single implementation behind the three scan call sites
//! (change detection, deletion detection, patch-candidate selection),
//! parameterized by walk direction.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

use crate::models::{AUDIO_LANGUAGES, GAME_DATA_DIRS, SchemaVariant};
use crate::services::{alias, hashing, ignore};

/// Verdict for one relative entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Added,
    Modified,
    Unchanged,
    Deleted,
}

/// One classified entry, carrying the resolved on-disk path for whichever
/// sides it exists on.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Path relative to the walked root, forward-slash separated.
    pub rel_path: String,
    /// Category-qualified path used for cross-root lookups, e.g.
    /// `GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/foo.pck`.
    pub qualified_path: String,
    pub old_path: Option<Utf8PathBuf>,
    pub new_path: Option<Utf8PathBuf>,
    pub classification: Classification,
}

/// Walk direction for [`classify_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// Enumerate the new tree; classify Added / Modified / Unchanged.
    Forward,
    /// Enumerate the old tree; report only Deleted entries.
    Backward,
}

/// Parameters for one tree scan. Roots are explicit so the same scan can
/// run on concurrent category workers without captured mutable state.
#[derive(Debug, Clone, Copy)]
pub struct TreeScan<'a> {
    pub direction: ScanDirection,
    /// Tree being enumerated: the new-version root (or subtree) for a
    /// forward scan, the old-version one for a backward scan.
    pub walk_root: &'a Utf8Path,
    /// Version root (old for forward, new for backward) the qualified path
    /// is resolved against when looking up the counterpart.
    pub counterpart_base: &'a Utf8Path,
    /// Prefix turning a walk-relative path into the qualified path; empty
    /// when the walk root is the version root itself.
    pub qualify_prefix: &'a str,
    /// New-version string, for the version-gated ignore rules.
    pub new_version: &'a str,
    /// Exclude entries inside any known audio-language subtree. Set when
    /// scanning the top-level game tree, whose audio subtrees are
    /// reconciled by their own category passes.
    pub skip_audio_subtrees: bool,
}

/// True when the qualified path lies inside a known audio-language subtree
/// under any data-directory variant and either schema layout.
pub fn is_audio_subtree(qualified_path: &str) -> bool {
    for data_dir in GAME_DATA_DIRS {
        for lang in AUDIO_LANGUAGES {
            for variant in SchemaVariant::ALL {
                let prefix = variant.audio_rel(data_dir, lang.name);
                if qualified_path.starts_with(&format!("{prefix}/")) {
                    return true;
                }
            }
        }
    }
    false
}

/// Walk `scan.walk_root` recursively and classify every non-ignored file.
///
/// Ignore rules and the structural audio exclusion run before any hashing,
/// so excluded files never incur hashing cost. Hash or enumeration failures
/// abort the scan; a silently skipped comparison would corrupt the manifest
/// correctness guarantee.
pub fn classify_tree(scan: &TreeScan<'_>) -> Result<Vec<ClassificationResult>> {
    let mut results = Vec::new();

    if !scan.walk_root.is_dir() {
        return Ok(results);
    }

    for entry in walkdir::WalkDir::new(scan.walk_root).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to enumerate tree under {}", scan.walk_root))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = Utf8Path::from_path(entry.path())
            .with_context(|| format!("Non-UTF-8 path under {}", scan.walk_root))?;
        let rel_path = full_path
            .strip_prefix(scan.walk_root)
            .with_context(|| format!("Path escaped walk root {}", scan.walk_root))?
            .as_str()
            .replace('\\', "/");

        let qualified_path = if scan.qualify_prefix.is_empty() {
            rel_path.clone()
        } else {
            format!("{}/{rel_path}", scan.qualify_prefix)
        };

        if scan.skip_audio_subtrees && is_audio_subtree(&qualified_path) {
            continue;
        }
        if ignore::should_ignore(&qualified_path, scan.new_version) {
            continue;
        }

        let counterpart = alias::find_in(scan.counterpart_base, &qualified_path);

        match scan.direction {
            ScanDirection::Forward => {
                let (old_path, classification) = match counterpart {
                    None => (None, Classification::Added),
                    Some(old_path) => {
                        let new_hash = hashing::sha256_file(full_path)?;
                        let old_hash = hashing::sha256_file(&old_path)?;
                        let classification = if new_hash == old_hash {
                            Classification::Unchanged
                        } else {
                            Classification::Modified
                        };
                        (Some(old_path), classification)
                    }
                };

                results.push(ClassificationResult {
                    rel_path,
                    qualified_path,
                    old_path,
                    new_path: Some(full_path.to_path_buf()),
                    classification,
                });
            }
            ScanDirection::Backward => {
                if counterpart.is_none() {
                    results.push(ClassificationResult {
                        rel_path,
                        qualified_path,
                        old_path: Some(full_path.to_path_buf()),
                        new_path: None,
                        classification: Classification::Deleted,
                    });
                }
            }
        }
    }

    Ok(results)
}

/// Compare a single old/new file pair with the same hash logic as the tree
/// walk, without enumeration. Used for the per-language package-version
/// markers that sit at the version root. Returns `None` when the new side
/// does not have the file.
pub fn classify_pair(
    old_path: &Utf8Path,
    new_path: &Utf8Path,
    qualified_path: &str,
) -> Result<Option<ClassificationResult>> {
    if !new_path.is_file() {
        return Ok(None);
    }

    let (old, classification) = if !old_path.is_file() {
        (None, Classification::Added)
    } else {
        let new_hash = hashing::sha256_file(new_path)?;
        let old_hash = hashing::sha256_file(old_path)?;
        let classification = if new_hash == old_hash {
            Classification::Unchanged
        } else {
            Classification::Modified
        };
        (Some(old_path.to_path_buf()), classification)
    };

    Ok(Some(ClassificationResult {
        rel_path: qualified_path.to_string(),
        qualified_path: qualified_path.to_string(),
        old_path: old,
        new_path: Some(new_path.to_path_buf()),
        classification,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    fn write(base: &Utf8Path, rel: &str, contents: &[u8]) {
        let path = crate::models::join_rel(base, rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_is_audio_subtree() {
        assert!(is_audio_subtree(
            "GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/a.pck"
        ));
        assert!(is_audio_subtree(
            "YuanShen_Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Chinese/b.pck"
        ));
        assert!(!is_audio_subtree("GenshinImpact_Data/globalgamemanagers"));
        // The language directory itself is not "inside" the subtree.
        assert!(!is_audio_subtree("GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese"));
    }

    #[test]
    fn test_forward_scan_classifies_all_states() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let old = base.join("old");
        let new = base.join("new");

        write(&old, "same.bin", b"identical");
        write(&new, "same.bin", b"identical");
        write(&old, "changed.bin", b"before");
        write(&new, "changed.bin", b"after");
        write(&new, "brand_new.bin", b"fresh");

        let scan = TreeScan {
            direction: ScanDirection::Forward,
            walk_root: &new,
            counterpart_base: &old,
            qualify_prefix: "",
            new_version: "5.6.0",
            skip_audio_subtrees: false,
        };
        let results = classify_tree(&scan).unwrap();
        assert_eq!(results.len(), 3);

        let verdict = |rel: &str| {
            results.iter().find(|r| r.rel_path == rel).unwrap().classification
        };
        assert_eq!(verdict("same.bin"), Classification::Unchanged);
        assert_eq!(verdict("changed.bin"), Classification::Modified);
        assert_eq!(verdict("brand_new.bin"), Classification::Added);
    }

    #[test]
    fn test_forward_scan_skips_ignored_before_hashing() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let old = base.join("old");
        let new = base.join("new");
        fs::create_dir_all(&old).unwrap();

        write(&new, "debug.log", b"noise");
        write(&new, "webCaches/blob", b"noise");
        write(&new, "kept.bin", b"content");

        let scan = TreeScan {
            direction: ScanDirection::Forward,
            walk_root: &new,
            counterpart_base: &old,
            qualify_prefix: "",
            new_version: "5.6.0",
            skip_audio_subtrees: false,
        };
        let results = classify_tree(&scan).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rel_path, "kept.bin");
    }

    #[test]
    fn test_backward_scan_reports_only_deleted() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let old = base.join("old");
        let new = base.join("new");

        write(&old, "kept.bin", b"same");
        write(&new, "kept.bin", b"same");
        write(&old, "removed.bin", b"gone");

        let scan = TreeScan {
            direction: ScanDirection::Backward,
            walk_root: &old,
            counterpart_base: &new,
            qualify_prefix: "",
            new_version: "5.6.0",
            skip_audio_subtrees: false,
        };
        let results = classify_tree(&scan).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].qualified_path, "removed.bin");
        assert_eq!(results[0].classification, Classification::Deleted);
        assert!(results[0].new_path.is_none());
    }

    #[test]
    fn test_schema_migration_is_unchanged_not_added_plus_deleted() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let old = base.join("old");
        let new = base.join("new");

        // Same content, different schema variant per version.
        write(&old, "Data/StreamingAssets/AudioAssets/Japanese/x.pck", b"voice");
        write(
            &new,
            "Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Japanese/x.pck",
            b"voice",
        );

        let forward = TreeScan {
            direction: ScanDirection::Forward,
            walk_root: &new,
            counterpart_base: &old,
            qualify_prefix: "",
            new_version: "1.6.1",
            skip_audio_subtrees: false,
        };
        let results = classify_tree(&forward).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].classification, Classification::Unchanged);

        let backward = TreeScan {
            direction: ScanDirection::Backward,
            walk_root: &old,
            counterpart_base: &new,
            qualify_prefix: "",
            new_version: "1.6.1",
            skip_audio_subtrees: false,
        };
        assert!(classify_tree(&backward).unwrap().is_empty());
    }

    #[test]
    fn test_game_scan_excludes_audio_subtrees() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let old = base.join("old");
        let new = base.join("new");
        fs::create_dir_all(&old).unwrap();

        write(&new, "GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/a.pck", b"x");
        write(&new, "GenshinImpact_Data/level0", b"y");

        let scan = TreeScan {
            direction: ScanDirection::Forward,
            walk_root: &new,
            counterpart_base: &old,
            qualify_prefix: "",
            new_version: "1.6.1",
            skip_audio_subtrees: true,
        };
        let results = classify_tree(&scan).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rel_path, "GenshinImpact_Data/level0");
    }

    #[test]
    fn test_qualify_prefix_applied() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let old = base.join("old");
        let new = base.join("new");
        fs::create_dir_all(&old).unwrap();

        let prefix = "Data/StreamingAssets/AudioAssets/Japanese";
        write(&new, &format!("{prefix}/Ambient_day.pck"), b"x");

        let walk_root = crate::models::join_rel(&new, prefix);
        let scan = TreeScan {
            direction: ScanDirection::Forward,
            walk_root: &walk_root,
            counterpart_base: &old,
            qualify_prefix: prefix,
            new_version: "1.6.1",
            skip_audio_subtrees: false,
        };
        let results = classify_tree(&scan).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rel_path, "Ambient_day.pck");
        assert_eq!(results[0].qualified_path, format!("{prefix}/Ambient_day.pck"));
        assert_eq!(results[0].classification, Classification::Added);
    }

    #[test]
    fn test_missing_walk_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        let missing = base.join("nope");
        let scan = TreeScan {
            direction: ScanDirection::Forward,
            walk_root: &missing,
            counterpart_base: &base,
            qualify_prefix: "",
            new_version: "5.6.0",
            skip_audio_subtrees: false,
        };
        assert!(classify_tree(&scan).unwrap().is_empty());
    }

    #[test]
    fn test_classify_pair() {
        let dir = TempDir::new().unwrap();
        let base = utf8(&dir);
        write(&base, "old/Audio_Japanese_pkg_version", b"5.5.0");
        write(&base, "new/Audio_Japanese_pkg_version", b"5.6.0");

        let result = classify_pair(
            &base.join("old/Audio_Japanese_pkg_version"),
            &base.join("new/Audio_Japanese_pkg_version"),
            "Audio_Japanese_pkg_version",
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.classification, Classification::Modified);

        // New side missing -> no result at all.
        assert!(
            classify_pair(
                &base.join("old/Audio_Japanese_pkg_version"),
                &base.join("new/Audio_Korean_pkg_version"),
                "Audio_Korean_pkg_version",
            )
            .unwrap()
            .is_none()
        );
    }
}

//! Path alias resolution between the two known audio directory schemas.
//!
//! Audio assets migrated from `StreamingAssets/AudioAssets/<lang>/...` to
//! `StreamingAssets/Audio/GeneratedSoundBanks/Windows/<lang>/...` between two
//! specific releases, so "the corresponding file in the other version" is not
//! always at the literal relative path. Resolution is a single substring
//! substitution per known prefix pair, tried in a fixed order; the first
//! candidate that exists on disk wins.

use camino::{Utf8Path, Utf8PathBuf};

use crate::models::join_rel;

const ASSETS_SEGMENT: &str = "AudioAssets";
const SOUNDBANKS_SEGMENT: &str = "Audio/GeneratedSoundBanks/Windows";

/// Ordered candidate relative paths for a cross-version lookup: the exact
/// path first, then the same suffix rewritten under the other schema.
/// Paths outside both schemas yield only the exact path.
pub fn candidates(rel_path: &str) -> Vec<String> {
    let mut out = vec![rel_path.to_string()];

    let assets_to_banks = rel_path.replace(ASSETS_SEGMENT, SOUNDBANKS_SEGMENT);
    if assets_to_banks != rel_path {
        out.push(assets_to_banks);
    }

    let banks_to_assets = rel_path.replace(SOUNDBANKS_SEGMENT, ASSETS_SEGMENT);
    if banks_to_assets != rel_path {
        out.push(banks_to_assets);
    }

    out
}

/// Resolve a relative entry against a version root, trying the exact path
/// and then each alias. Returns the first candidate that exists as a file,
/// or `None` when the entry is absent from that version.
pub fn find_in(base: &Utf8Path, rel_path: &str) -> Option<Utf8PathBuf> {
    for candidate in candidates(rel_path) {
        let full = join_rel(base, &candidate);
        if full.is_file() {
            return Some(full);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_non_audio_path_has_single_candidate() {
        assert_eq!(candidates("GenshinImpact_Data/globalgamemanagers"), vec![
            "GenshinImpact_Data/globalgamemanagers".to_string()
        ]);
    }

    #[test]
    fn test_assets_path_aliases_to_soundbanks() {
        let list = candidates("GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/VO.pck");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], "GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese/VO.pck");
        assert_eq!(
            list[1],
            "GenshinImpact_Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Japanese/VO.pck"
        );
    }

    #[test]
    fn test_soundbanks_path_aliases_to_assets() {
        let list = candidates(
            "GenshinImpact_Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Korean/x.pck",
        );
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], "GenshinImpact_Data/StreamingAssets/AudioAssets/Korean/x.pck");
    }

    #[test]
    fn test_find_in_prefers_exact_path() {
        let dir = TempDir::new().unwrap();
        let base = camino::Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();

        let exact = base.join("Data/StreamingAssets/AudioAssets/Japanese");
        fs::create_dir_all(&exact).unwrap();
        fs::write(exact.join("a.pck"), b"exact").unwrap();

        let found = find_in(&base, "Data/StreamingAssets/AudioAssets/Japanese/a.pck").unwrap();
        assert_eq!(found, exact.join("a.pck"));
    }

    #[test]
    fn test_find_in_falls_back_to_alias() {
        let dir = TempDir::new().unwrap();
        let base = camino::Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();

        let old_layout = base.join("Data/StreamingAssets/AudioAssets/Japanese");
        fs::create_dir_all(&old_layout).unwrap();
        fs::write(old_layout.join("a.pck"), b"moved").unwrap();

        // Lookup by the new-schema path still finds the old-schema file.
        let found = find_in(
            &base,
            "Data/StreamingAssets/Audio/GeneratedSoundBanks/Windows/Japanese/a.pck",
        )
        .unwrap();
        assert_eq!(found, old_layout.join("a.pck"));
    }

    #[test]
    fn test_find_in_reports_absent() {
        let dir = TempDir::new().unwrap();
        let base = camino::Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        assert!(find_in(&base, "Data/StreamingAssets/AudioAssets/Japanese/missing.pck").is_none());
    }
}

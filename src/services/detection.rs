//! Detection of the active installation root and of a language's audio
//! directory layout for a specific installed version.

use camino::{Utf8Path, Utf8PathBuf};

use crate::models::{GAME_DATA_DIRS, GAME_ROOT_DIRS, InstallRoot, SchemaVariant, join_rel};

/// Probe the recognized root name variants and return the one that exists
/// on disk for both versions simultaneously. Exactly this variant is used
/// for the rest of the run.
pub fn detect_install_root(
    work_dir: &Utf8Path,
    old_ver: &str,
    new_ver: &str,
) -> Option<InstallRoot> {
    for (root_dir, data_dir) in GAME_ROOT_DIRS.iter().zip(GAME_DATA_DIRS.iter()) {
        let old_base = work_dir.join(format!("{root_dir}_{old_ver}"));
        let new_base = work_dir.join(format!("{root_dir}_{new_ver}"));

        if old_base.is_dir() && new_base.is_dir() {
            tracing::info!("Detected install root variant: {root_dir}");
            return Some(InstallRoot { root_dir, data_dir });
        }
    }

    None
}

/// Expected old-version folder names, for the error message when no variant
/// matches.
pub fn expected_roots(old_ver: &str) -> Vec<String> {
    GAME_ROOT_DIRS.iter().map(|root| format!("{root}_{old_ver}")).collect()
}

/// A language's audio tree as found under one version root.
#[derive(Debug, Clone)]
pub struct AudioDir {
    pub path: Utf8PathBuf,
    pub data_dir: &'static str,
    pub variant: SchemaVariant,
}

/// Locate a language's audio directory under a version root, probing every
/// data-directory variant and both schema layouts. `None` means the version
/// does not ship this language (structural absence, not an error).
pub fn find_audio_dir(version_base: &Utf8Path, lang: &str) -> Option<AudioDir> {
    for data_dir in GAME_DATA_DIRS {
        for variant in SchemaVariant::ALL {
            let path = join_rel(version_base, &variant.audio_rel(data_dir, lang));
            if path.is_dir() {
                return Some(AudioDir { path, data_dir, variant });
            }
        }
    }
    None
}

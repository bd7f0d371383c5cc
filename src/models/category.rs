//! Reconciliation categories and the known on-disk layout variants.
//!
//! A category is one independently reconciled unit: the game tree itself, or
//! one audio language. Each category classifies its own files and writes its
//! own manifests; nothing is shared between categories except the read-only
//! run configuration.

use std::fmt;

/// Recognized installation root directory names, in probe order.
pub const GAME_ROOT_DIRS: [&str; 3] = ["GenshinImpact", "Genshin", "YuanShen"];

/// Data directory names matching [`GAME_ROOT_DIRS`] index-for-index.
pub const GAME_DATA_DIRS: [&str; 3] = ["GenshinImpact_Data", "Genshin_Data", "YuanShen_Data"];

/// One shippable audio language: on-disk folder name plus the stable tag
/// used for output folders and config keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioLanguage {
    pub name: &'static str,
    pub tag: &'static str,
}

impl AudioLanguage {
    /// Name of the per-language package-version marker file sitting at the
    /// version root (outside the walked audio subtree).
    pub fn marker_file(&self) -> String {
        format!("Audio_{}_pkg_version", self.name)
    }
}

/// All audio languages the client ships, in config order.
pub const AUDIO_LANGUAGES: [AudioLanguage; 4] = [
    AudioLanguage { name: "English(US)", tag: "audio_en-us" },
    AudioLanguage { name: "Japanese", tag: "audio_ja-jp" },
    AudioLanguage { name: "Korean", tag: "audio_ko-kr" },
    AudioLanguage { name: "Chinese", tag: "audio_zh-cn" },
];

/// The two known on-disk layouts for a language's audio assets. A given
/// installation uses exactly one per language, but the old and new versions
/// may use different ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    AudioAssets,
    GeneratedSoundBanks,
}

impl SchemaVariant {
    /// Probe order matters: the `AudioAssets` layout is checked first,
    /// matching the priority of alias resolution.
    pub const ALL: [SchemaVariant; 2] =
        [SchemaVariant::AudioAssets, SchemaVariant::GeneratedSoundBanks];

    /// Path prefix of this layout below the data directory.
    pub fn prefix(self) -> &'static str {
        match self {
            SchemaVariant::AudioAssets => "StreamingAssets/AudioAssets",
            SchemaVariant::GeneratedSoundBanks => "StreamingAssets/Audio/GeneratedSoundBanks/Windows",
        }
    }

    /// Relative path of a language's audio tree under a version root,
    /// e.g. `GenshinImpact_Data/StreamingAssets/AudioAssets/Japanese`.
    pub fn audio_rel(self, data_dir: &str, lang: &str) -> String {
        format!("{data_dir}/{}/{lang}", self.prefix())
    }
}

/// The active installation root for a run: which of the recognized name
/// variants exists on disk for both versions. Immutable once detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallRoot {
    pub root_dir: &'static str,
    pub data_dir: &'static str,
}

/// One logical reconciliation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Game,
    Audio(AudioLanguage),
}

impl Category {
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Game => "game",
            Category::Audio(lang) => lang.tag,
        }
    }

    /// Deterministic output directory name for this category and version
    /// pair, e.g. `game_5.5.0_5.6.0_hdiff`.
    pub fn output_dir(&self, old_ver: &str, new_ver: &str) -> String {
        format!("{}_{old_ver}_{new_ver}_hdiff", self.tag())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Game => write!(f, "game"),
            Category::Audio(lang) => write!(f, "audio:{}", lang.name),
        }
    }
}

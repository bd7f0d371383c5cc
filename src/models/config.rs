use serde::{Deserialize, Serialize};

use crate::models::category::{AUDIO_LANGUAGES, AudioLanguage, Category};
use crate::models::version::GameVersion;

/// Run configuration loaded from `config.json`.
///
/// Field names mirror the config file keys; the audio flags keep their
/// hyphenated tags so an existing config file round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub old_ver: String,
    pub new_ver: String,

    /// 0 = sequential, 1 = parallel.
    pub mode: u8,

    /// Upper bound on concurrent external subprocess invocations.
    pub max_threads: usize,

    /// Keep staging folders after archiving instead of deleting them.
    pub keep_source_folder: bool,

    pub log_level: String,

    /// Reconcile the main game tree.
    pub game: bool,

    #[serde(rename = "audio_en-us")]
    pub audio_en_us: bool,

    #[serde(rename = "audio_ja-jp")]
    pub audio_ja_jp: bool,

    #[serde(rename = "audio_ko-kr")]
    pub audio_ko_kr: bool,

    #[serde(rename = "audio_zh-cn")]
    pub audio_zh_cn: bool,

    /// External binary-patch generator. Resolved from PATH when not absolute.
    #[serde(default = "default_hdiffz_path")]
    pub hdiffz_path: String,

    /// External archiver. Resolved from PATH when not absolute.
    #[serde(default = "default_seven_zip_path")]
    pub seven_zip_path: String,
}

fn default_hdiffz_path() -> String {
    "hdiffz".to_string()
}

fn default_seven_zip_path() -> String {
    "7z".to_string()
}

fn default_max_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(1)
        .max(1)
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            old_ver: "5.5.0".to_string(),
            new_ver: "5.6.0".to_string(),
            mode: 0,
            max_threads: default_max_threads(),
            keep_source_folder: false,
            log_level: "DEBUG".to_string(),
            game: true,
            audio_en_us: true,
            audio_ja_jp: true,
            audio_ko_kr: true,
            audio_zh_cn: true,
            hdiffz_path: default_hdiffz_path(),
            seven_zip_path: default_seven_zip_path(),
        }
    }
}

/// Execution mode for the category orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyMode {
    Sequential,
    Parallel,
}

impl BuilderConfig {
    pub fn concurrency_mode(&self) -> ConcurrencyMode {
        if self.mode == 1 {
            ConcurrencyMode::Parallel
        } else {
            ConcurrencyMode::Sequential
        }
    }

    /// Whether the audio category with the given tag is enabled.
    pub fn audio_enabled(&self, lang: &AudioLanguage) -> bool {
        match lang.tag {
            "audio_en-us" => self.audio_en_us,
            "audio_ja-jp" => self.audio_ja_jp,
            "audio_ko-kr" => self.audio_ko_kr,
            "audio_zh-cn" => self.audio_zh_cn,
            _ => false,
        }
    }

    /// Enabled categories in stable order: game first, then the audio
    /// languages in config order.
    pub fn enabled_categories(&self) -> Vec<Category> {
        let mut categories = Vec::new();
        if self.game {
            categories.push(Category::Game);
        }
        for lang in AUDIO_LANGUAGES {
            if self.audio_enabled(&lang) {
                categories.push(Category::Audio(lang));
            }
        }
        categories
    }

    /// Validate the whole configuration, collecting every problem instead
    /// of stopping at the first so the user can fix the file in one pass.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.old_ver.trim().is_empty() {
            errors.push("'old_ver' is missing or not a valid string.".to_string());
        }
        if self.new_ver.trim().is_empty() {
            errors.push("'new_ver' is missing or not a valid string.".to_string());
        }

        if self.mode > 1 {
            errors.push("'mode' must be 0 (sequential) or 1 (parallel).".to_string());
        }

        let cpu_count = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        if self.max_threads < 1 || self.max_threads > cpu_count {
            errors.push(format!(
                "'max_threads' must be an integer between 1 and {cpu_count}, based on your CPU."
            ));
        }

        if errors.is_empty() {
            let old = GameVersion::validate_release(&self.old_ver, &mut errors);
            let new = GameVersion::validate_release(&self.new_ver, &mut errors);

            if self.old_ver == self.new_ver {
                errors.push("'old_ver' and 'new_ver' cannot be the same.".to_string());
            } else if let (Some(old), Some(new)) = (old, new) {
                if old >= new {
                    errors.push("'old_ver' must be lower than 'new_ver'.".to_string());
                }
            }
        }

        errors
    }
}

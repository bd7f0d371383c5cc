use crate::models::BuilderConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Default name of the run configuration file, expected next to the binary.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Outcome of [`ConfigManager::load_or_init`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// The config file existed and parsed.
    Loaded(BuilderConfig),
    /// No config file was present; a default one was written for the user
    /// to edit. The run should stop here.
    Created,
}

/// Configuration manager for the JSON run configuration.
///
/// First run writes a default `config.json` and stops so the user can fill
/// in the version pair; later runs load and validate it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at the given working directory.
    pub fn new<P: AsRef<Utf8Path>>(work_dir: P) -> Self {
        Self { config_path: work_dir.as_ref().join(CONFIG_FILE_NAME) }
    }

    /// Path of the config file this manager reads and writes.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }

    /// Load the configuration, or write a default one when missing.
    pub fn load_or_init(&self) -> Result<LoadOutcome> {
        if !self.config_path.exists() {
            self.write_default()?;
            return Ok(LoadOutcome::Created);
        }
        Ok(LoadOutcome::Loaded(self.load()?))
    }

    /// Load and parse the configuration file.
    pub fn load(&self) -> Result<BuilderConfig> {
        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: BuilderConfig = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded config from {}", self.config_path);
        Ok(config)
    }

    /// Write a default configuration file for the user to edit.
    pub fn write_default(&self) -> Result<()> {
        let config = BuilderConfig::default();
        let json_string = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        fs::write(&self.config_path, json_string)
            .with_context(|| format!("Failed to write default config: {}", self.config_path))?;

        tracing::info!("Wrote default config to {}", self.config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (ConfigManager::new(&work_dir), temp_dir)
    }

    #[test]
    fn test_first_run_writes_default_and_reports_created() {
        let (manager, _temp_dir) = create_test_config_manager();

        let outcome = manager.load_or_init().unwrap();
        assert!(matches!(outcome, LoadOutcome::Created));
        assert!(manager.config_path().exists());

        // Second run loads the file it just wrote
        let outcome = manager.load_or_init().unwrap();
        match outcome {
            LoadOutcome::Loaded(config) => {
                assert_eq!(config.old_ver, BuilderConfig::default().old_ver);
                assert_eq!(config.mode, 0);
            }
            LoadOutcome::Created => panic!("expected Loaded on second run"),
        }
    }

    #[test]
    fn test_load_round_trips_hyphenated_keys() {
        let (manager, _temp_dir) = create_test_config_manager();
        manager.write_default().unwrap();

        let raw = fs::read_to_string(manager.config_path()).unwrap();
        assert!(raw.contains("\"audio_en-us\""));
        assert!(raw.contains("\"audio_zh-cn\""));

        let loaded = manager.load().unwrap();
        assert!(loaded.audio_en_us);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.config_path(), "{not json").unwrap();

        assert!(manager.load().is_err());
        assert!(manager.load_or_init().is_err());
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

use crate::metrics::Metrics;
use crate::models::category::{Category, InstallRoot};
use crate::models::config::BuilderConfig;
use crate::models::version::GameVersion;

/// Immutable per-run context, constructed once at startup after the config
/// has been validated and the install root detected.
///
/// Every pipeline stage and service takes this by reference; no component
/// reads ambient process state, which is what makes the parallel category
/// workers safe.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: BuilderConfig,
    pub old_version: GameVersion,
    pub new_version: GameVersion,
    pub root: InstallRoot,
    pub work_dir: Utf8PathBuf,
    pub metrics: Arc<Metrics>,
}

impl RunContext {
    pub fn new(config: BuilderConfig, root: InstallRoot, work_dir: Utf8PathBuf) -> Result<Self> {
        let old_version = GameVersion::parse(&config.old_ver)
            .with_context(|| format!("Invalid old_ver '{}'", config.old_ver))?;
        let new_version = GameVersion::parse(&config.new_ver)
            .with_context(|| format!("Invalid new_ver '{}'", config.new_ver))?;

        Ok(Self {
            config,
            old_version,
            new_version,
            root,
            work_dir,
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Root of the old installed version, e.g. `GenshinImpact_5.5.0`.
    pub fn old_base(&self) -> Utf8PathBuf {
        self.work_dir.join(format!("{}_{}", self.root.root_dir, self.config.old_ver))
    }

    /// Root of the new installed version, e.g. `GenshinImpact_5.6.0`.
    pub fn new_base(&self) -> Utf8PathBuf {
        self.work_dir.join(format!("{}_{}", self.root.root_dir, self.config.new_ver))
    }

    /// Staging/output directory for one category.
    pub fn output_dir(&self, category: &Category) -> Utf8PathBuf {
        self.work_dir.join(category.output_dir(&self.config.old_ver, &self.config.new_ver))
    }

    pub fn enabled_categories(&self) -> Vec<Category> {
        self.config.enabled_categories()
    }
}

/// Join a forward-slash relative entry onto a filesystem base path.
pub fn join_rel(base: &Utf8Path, rel: &str) -> Utf8PathBuf {
    let mut out = base.to_path_buf();
    for segment in rel.split('/').filter(|s| !s.is_empty()) {
        out.push(segment);
    }
    out
}

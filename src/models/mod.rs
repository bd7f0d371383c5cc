//! Data models for the hdiff builder.
//!
//! This module contains the core data structures used throughout the tool:
//! - [`BuilderConfig`]: Run configuration loaded from `config.json`
//! - [`RunContext`]: The immutable per-run context passed into every component
//! - [`Category`] / [`SchemaVariant`]: Reconciliation units and on-disk layouts
//! - [`GameVersion`]: Release version parsing, validation and comparison
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: `BuilderConfig` derives `Serialize`/`Deserialize` for JSON persistence
//! - **Immutable**: `RunContext` is built once at startup; pipeline stages only read it,
//!   which is what allows categories to run on parallel workers without locks

pub mod category;
pub mod config;
pub mod context;
pub mod version;

pub use category::{
    AUDIO_LANGUAGES, AudioLanguage, Category, GAME_DATA_DIRS, GAME_ROOT_DIRS, InstallRoot,
    SchemaVariant,
};
pub use config::{BuilderConfig, ConcurrencyMode};
pub use context::{RunContext, join_rel};
pub use version::{GameVersion, version_at_least};

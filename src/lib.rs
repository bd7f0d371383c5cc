// hdiff-builder - update-package builder for versioned game installations
//
// This is the library crate containing the reconciliation engine and the
// pipeline stages. The binary crate (main.rs) provides the CLI entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, LoadOutcome};
pub use metrics::Metrics;
pub use models::{BuilderConfig, Category, RunContext};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Level names accepted in the config's `log_level` field. `NONE` disables
/// the file layer; console output stays on regardless.
const RECOGNIZED_LEVELS: [&str; 8] =
    ["TRACE", "DEBUG", "INFO", "WARN", "WARNING", "ERROR", "FATAL", "NONE"];

fn filter_for(level: &str) -> EnvFilter {
    match level {
        "TRACE" => EnvFilter::new("trace"),
        "DEBUG" => EnvFilter::new("debug"),
        "INFO" | "NONE" => EnvFilter::new("info"),
        "WARN" | "WARNING" => EnvFilter::new("warn"),
        "ERROR" | "FATAL" => EnvFilter::new("error"),
        _ => EnvFilter::new("info"),
    }
}

/// Setup logging with a daily-rotating file appender and console output.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs")
/// * `log_prefix` - Prefix for log files (e.g., "hdiff-builder")
/// * `log_level` - Level name from the config, case-insensitive
///
/// # Returns
/// A guard that must be held for the duration of the program to keep the
/// file writer flushing. `None` when file logging is disabled via `NONE`.
pub fn setup_logging(
    log_dir: &str,
    log_prefix: &str,
    log_level: &str,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let level = log_level.trim().to_uppercase();
    let env_filter = filter_for(&level);

    let guard = if level == "NONE" {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
        None
    } else {
        // Create log directory if it doesn't exist
        let log_path = Utf8PathBuf::from(log_dir);
        if !log_path.exists() {
            fs::create_dir_all(&log_path)
                .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
        }

        // Create daily rotating file appender
        let file_appender = rolling::daily(log_dir, log_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // No ANSI codes in log files
            .with_target(true)
            .with_thread_ids(true);

        let console_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer)
            .init();

        Some(guard)
    };

    if !RECOGNIZED_LEVELS.contains(&level.as_str()) {
        tracing::warn!("Unknown log_level '{}', defaulting to INFO", log_level);
    }

    tracing::debug!(
        "Logging initialized: dir={}, prefix={}, level={}",
        log_dir,
        log_prefix,
        level
    );

    Ok(guard)
}

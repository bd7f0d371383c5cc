//! hdiff-builder - update-package builder for versioned game installations
//!
//! Main entry point for the CLI application.
//!
//! # Execution Flow
//!
//! 1. Load `config.json` from the working directory; on first run a default
//!    one is written and the process stops so the user can fill it in
//! 2. Initialize logging -> logs/hdiff-builder.<date> plus console output
//! 3. Validate the configuration, reporting every problem at once
//! 4. Detect the installation root variant present for both versions
//! 5. Run the pipeline: diff -> delete -> patch -> archive
//! 6. Log the run summary and exit
//!
//! The classification stages run on plain threads (one per category in
//! parallel mode); the patch and archive stages run on a tokio runtime
//! because they spend their time waiting on external subprocesses.

use std::process::ExitCode;

use anyhow::Result;
use camino::Utf8PathBuf;
use hdiff_builder::services::{detect_install_root, expected_roots};
use hdiff_builder::{APP_NAME, ConfigManager, LoadOutcome, RunContext, VERSION};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let start = std::time::Instant::now();

    let work_dir = Utf8PathBuf::from(".");
    let config_manager = ConfigManager::new(&work_dir);
    let outcome = config_manager.load_or_init();

    // The log level comes from the config when it loaded; anything else
    // falls back to INFO so the failure itself is visible.
    let log_level = match &outcome {
        Ok(LoadOutcome::Loaded(config)) => config.log_level.clone(),
        _ => "INFO".to_string(),
    };
    let _guard = hdiff_builder::logging::setup_logging("logs", APP_NAME, &log_level)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config = match outcome {
        Ok(LoadOutcome::Loaded(config)) => config,
        Ok(LoadOutcome::Created) => {
            tracing::warn!(
                "No {} found; a default one was created",
                hdiff_builder::config::CONFIG_FILE_NAME
            );
            tracing::warn!("Edit it with your version pair and run again");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            tracing::error!("{e:#}");
            tracing::error!(
                "Fix or delete {} and run again",
                hdiff_builder::config::CONFIG_FILE_NAME
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    // Report every config problem in one pass instead of failing piecemeal.
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{error}");
        }
        tracing::error!(
            "Found {} problem(s) in {}",
            errors.len(),
            hdiff_builder::config::CONFIG_FILE_NAME
        );
        return Ok(ExitCode::FAILURE);
    }

    let Some(root) = detect_install_root(&work_dir, &config.old_ver, &config.new_ver) else {
        tracing::error!(
            "No installation found for both {} and {}",
            config.old_ver,
            config.new_ver
        );
        tracing::error!(
            "Expected one of: {} (with the matching new-version folder)",
            expected_roots(&config.old_ver).join(", ")
        );
        return Ok(ExitCode::FAILURE);
    };

    let ctx = RunContext::new(config, root, work_dir)?;

    // The runtime only drives subprocess invocations, so the default worker
    // count is plenty; file-level concurrency is gated by max_threads.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("hdiff-worker")
        .build()?;

    hdiff_builder::pipeline::run(&ctx, &runtime)?;

    ctx.metrics.log_summary();

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(ExitCode::SUCCESS)
}

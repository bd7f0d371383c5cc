//! The four-stage pipeline: diff, delete, patch, archive.
//!
//! Stages run strictly in order; within the classification stages the
//! enabled categories run sequentially or on one worker thread each,
//! depending on the configured mode. The patch and archive stages are
//! async because they spend their time waiting on external subprocesses.

pub mod archive;
pub mod delete;
pub mod diff;
pub mod patch;

use anyhow::Result;
use tokio::runtime::Runtime;

use crate::models::{Category, ConcurrencyMode, RunContext};

/// Run a classification stage over the enabled categories, either in a
/// sequential loop or on one scoped thread per category. Category workers
/// share nothing mutable; the first error wins and fails the stage.
fn run_categories<F>(ctx: &RunContext, stage: &str, f: F) -> Result<()>
where
    F: Fn(&RunContext, Category) -> Result<()> + Sync,
{
    let categories = ctx.enabled_categories();

    match ctx.config.concurrency_mode() {
        ConcurrencyMode::Sequential => {
            for category in categories {
                f(ctx, category)?;
            }
            Ok(())
        }
        ConcurrencyMode::Parallel => {
            let f = &f;
            let results = std::thread::scope(|scope| {
                let handles: Vec<_> = categories
                    .iter()
                    .map(|&category| scope.spawn(move || f(ctx, category)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(result) => result,
                        Err(_) => Err(anyhow::anyhow!("{stage} category worker panicked")),
                    })
                    .collect::<Vec<_>>()
            });
            for result in results {
                result?;
            }
            Ok(())
        }
    }
}

/// Execute the full pipeline for one validated run.
pub fn run(ctx: &RunContext, runtime: &Runtime) -> Result<()> {
    let start = std::time::Instant::now();

    tracing::info!(
        "Building diff files for {} -> {}",
        ctx.config.old_ver,
        ctx.config.new_ver
    );
    run_categories(ctx, "diff", diff::run_category)?;
    tracing::info!("Diff stage completed in {:.2}s", start.elapsed().as_secs_f64());

    run_categories(ctx, "delete", delete::run_category)?;

    runtime.block_on(patch::run(ctx))?;
    runtime.block_on(archive::run(ctx))?;

    tracing::info!("Pipeline completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

//! Archive stage: compress every category staging folder that exists into
//! `<folder>.7z` next to it.
//!
//! All five category folders are probed regardless of the enable flags, so
//! staging output left by an earlier run with different flags still gets
//! packaged. Archiver failures are logged and the remaining folders continue.

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tokio::sync::Semaphore;

use crate::metrics::Metrics;
use crate::models::{AUDIO_LANGUAGES, Category, ConcurrencyMode, RunContext};
use crate::services::ArchiveService;

/// Run the archive stage over all category folders.
pub async fn run(ctx: &RunContext) -> Result<()> {
    let service = ArchiveService::new(ctx.config.seven_zip_path.clone());

    let mut categories = vec![Category::Game];
    categories.extend(AUDIO_LANGUAGES.map(Category::Audio));

    match ctx.config.concurrency_mode() {
        ConcurrencyMode::Sequential => {
            for category in categories {
                compress_folder(
                    Arc::clone(&ctx.metrics),
                    service.clone(),
                    ctx.output_dir(&category),
                    ctx.config.keep_source_folder,
                )
                .await;
            }
        }
        ConcurrencyMode::Parallel => {
            let semaphore = Arc::new(Semaphore::new(ctx.config.max_threads));
            let mut handles = Vec::new();
            for category in categories {
                let semaphore = Arc::clone(&semaphore);
                let metrics = Arc::clone(&ctx.metrics);
                let service = service.clone();
                let folder = ctx.output_dir(&category);
                let keep_source = ctx.config.keep_source_folder;
                handles.push(tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return;
                    };
                    compress_folder(metrics, service, folder, keep_source).await;
                }));
            }
            for handle in handles {
                handle.await.context("Archive worker panicked")?;
            }
        }
    }

    Ok(())
}

/// Compress one staging folder, then delete it unless the config keeps
/// sources. Failures never abort the stage.
async fn compress_folder(
    metrics: Arc<Metrics>,
    service: ArchiveService,
    folder: Utf8PathBuf,
    keep_source: bool,
) {
    if !folder.is_dir() {
        tracing::debug!("Folder not found, skipping: {folder}");
        return;
    }

    let Some(folder_name) = folder.file_name() else {
        tracing::error!("Staging folder has no name: {folder}");
        return;
    };
    let archive_name = format!("{folder_name}.7z");

    tracing::info!("Compressing {folder} -> {archive_name}");
    let start = std::time::Instant::now();

    if let Err(e) = service.compress(&folder, &archive_name).await {
        tracing::error!("Compression failed for {folder}: {e}");
        return;
    }

    metrics.record_archive_created();
    tracing::info!("{archive_name} created in {:.2}s", start.elapsed().as_secs_f64());

    if !keep_source {
        match std::fs::remove_dir_all(&folder) {
            Ok(()) => tracing::info!("Removed {folder} after compression"),
            Err(e) => tracing::error!("Failed to remove {folder}: {e}"),
        }
    }
}

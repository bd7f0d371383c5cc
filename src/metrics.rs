// Performance metrics module
//
// Lightweight run-wide counters for the pipeline stages

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Run-wide metrics.
///
/// Uses atomic operations for thread-safe tracking without locks; the
/// counters are the only state shared across concurrent category workers.
/// Logged as a summary when the run finishes.
#[derive(Debug)]
pub struct Metrics {
    /// Files staged because they are new or changed
    pub files_staged: AtomicUsize,

    /// Files skipped as unchanged (hash match)
    pub files_unchanged: AtomicUsize,

    /// Files recorded in deleted-file manifests
    pub files_deleted: AtomicUsize,

    /// Patches successfully generated
    pub patches_created: AtomicUsize,

    /// Patch candidates skipped (no old counterpart, shipped whole)
    pub patches_skipped: AtomicUsize,

    /// Patch generation failures
    pub patches_failed: AtomicUsize,

    /// Archives successfully created
    pub archives_created: AtomicUsize,

    /// Total bytes copied into staging folders
    pub bytes_staged: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            files_staged: AtomicUsize::new(0),
            files_unchanged: AtomicUsize::new(0),
            files_deleted: AtomicUsize::new(0),
            patches_created: AtomicUsize::new(0),
            patches_skipped: AtomicUsize::new(0),
            patches_failed: AtomicUsize::new(0),
            archives_created: AtomicUsize::new(0),
            bytes_staged: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_file_staged(&self) {
        self.files_staged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_unchanged(&self) {
        self.files_unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_deleted(&self) {
        self.files_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_patch_created(&self) {
        self.patches_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_patch_skipped(&self) {
        self.patches_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_patch_failed(&self) {
        self.patches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archive_created(&self) {
        self.archives_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bytes_staged(&self, bytes: u64) {
        self.bytes_staged.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log a run summary
    pub fn log_summary(&self) {
        tracing::info!("=== Run Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Files: {} staged ({} bytes), {} unchanged, {} deleted",
            self.files_staged.load(Ordering::Relaxed),
            self.bytes_staged.load(Ordering::Relaxed),
            self.files_unchanged.load(Ordering::Relaxed),
            self.files_deleted.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Patches: {} created, {} skipped, {} failed",
            self.patches_created.load(Ordering::Relaxed),
            self.patches_skipped.load(Ordering::Relaxed),
            self.patches_failed.load(Ordering::Relaxed)
        );
        tracing::info!("Archives: {}", self.archives_created.load(Ordering::Relaxed));
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = Metrics::new();
        assert_eq!(metrics.files_staged.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.patches_failed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_operations() {
        let metrics = Metrics::new();

        metrics.record_file_staged();
        metrics.record_file_staged();
        metrics.record_file_unchanged();
        metrics.record_file_deleted();
        metrics.record_patch_created();
        metrics.record_patch_failed();
        metrics.record_bytes_staged(1024);

        assert_eq!(metrics.files_staged.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.files_unchanged.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.files_deleted.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.patches_created.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.patches_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.bytes_staged.load(Ordering::Relaxed), 1024);
    }

    #[test]
    fn test_uptime_advances() {
        let metrics = Metrics::new();
        std::thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}

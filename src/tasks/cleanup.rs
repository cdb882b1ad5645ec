//! Age Cleanup Task
//!
//! Background task that periodically removes aged cache entries, reclaiming
//! space without waiting for a future access to the same keys.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ImageCache;

/// Spawns a background task that periodically removes aged cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between cleanup runs. Each run uses the cache's configured max age as the
/// threshold.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: ImageCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting age cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup(None).await;

            // Log cleanup statistics
            if removed > 0 {
                info!("Age cleanup: removed {} aged entries", removed);
            } else {
                debug!("Age cleanup: no aged entries found");
            }
        }
    })
}

//! Periodic cleanup of stale auth sessions.
//!
//! Spawns a background task that deletes revoked and expired rows from
//! `user_sessions`. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use atelier_db::repositories::SessionRepo;
use atelier_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the session purge loop until `cancel` is triggered.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = PURGE_INTERVAL.as_secs(),
        "Session purge job started"
    );

    let mut interval = tokio::time::interval(PURGE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session purge job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::purge_stale(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session purge: removed stale rows");
                        } else {
                            tracing::debug!("Session purge: nothing to remove");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session purge failed");
                    }
                }
            }
        }
    }
}

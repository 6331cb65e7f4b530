//! Expiration Sweeper
//!
//! Background task that periodically evicts expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheState;

/// Spawns the sweeper for one cache.
///
/// Every `interval` the task takes the cache lock and evicts every entry past
/// its expiration. File removal errors are logged and the record is pruned
/// anyway. The loop exits once `shutdown` turns `true` or its sender is
/// dropped.
pub(crate) fn spawn_sweeper_task(
    state: Arc<Mutex<CacheState>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(?interval, "sweeper started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let removed = {
                let mut state = state.lock().await;
                state.sweep_expired().await
            };

            if removed > 0 {
                info!("sweeper: removed {} expired entries", removed);
            } else {
                debug!("sweeper: no expired entries found");
            }
        }

        debug!("sweeper stopped");
    })
}

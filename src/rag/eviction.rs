// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Background sweep deleting stores that have been idle too long

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::registry::StoreRegistry;

/// Spawn a task calling [`StoreRegistry::evict_idle`] every `interval`
///
/// Runs until `shutdown` is cancelled. An answer already holding an index
/// snapshot completes normally; later lookups see the store as gone.
pub fn spawn_idle_sweeper(
    registry: Arc<StoreRegistry>,
    ttl: Duration,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    info!(
        ttl_secs = ttl.as_secs(),
        interval_secs = interval.as_secs(),
        "Idle store eviction enabled"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Idle store sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let evicted = registry.evict_idle(ttl).await;
                    for id in evicted {
                        info!(store_id = %id, "Evicted idle vector store");
                    }
                }
            }
        }
    })
}

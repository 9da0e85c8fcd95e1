// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Store registry: identifier -> vector store record
//!
//! One coarse `RwLock` guards the map. Lookups take the read lock and hand
//! out snapshots holding their own `Arc<VectorIndex>`, so no lock is held
//! while an index is queried. Deleted stores stay in the map as tombstones
//! so identifiers are never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{RagError, RagResult};
use super::types::StoreStatus;
use super::vector_index::VectorIndex;

/// Why a build failed, kept on the record after `Building -> Failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFailure {
    pub code: String,
    pub message: String,
}

impl From<&RagError> for StoreFailure {
    fn from(err: &RagError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Public view of a store; never exposes vectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub id: String,
    #[serde(rename = "file_name")]
    pub source_name: Option<String>,
    pub status: StoreStatus,
}

/// Snapshot of a store record at lookup time
#[derive(Debug, Clone)]
pub struct Store {
    pub id: String,
    pub source_name: Option<String>,
    pub status: StoreStatus,
    pub index: Option<Arc<VectorIndex>>,
    pub failure: Option<StoreFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

struct StoreRecord {
    source_name: Option<String>,
    status: StoreStatus,
    index: Option<Arc<VectorIndex>>,
    failure: Option<StoreFailure>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Milliseconds since the Unix epoch; written through shared references
    last_used_ms: AtomicI64,
    build_token: CancellationToken,
}

impl StoreRecord {
    fn snapshot(&self, id: &str) -> Store {
        Store {
            id: id.to_string(),
            source_name: self.source_name.clone(),
            status: self.status,
            index: self.index.clone(),
            failure: self.failure.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn summary(&self, id: &str) -> StoreSummary {
        StoreSummary {
            id: id.to_string(),
            source_name: self.source_name.clone(),
            status: self.status,
        }
    }

    fn touch(&self) {
        self.last_used_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_for(&self, now_ms: i64) -> Duration {
        let last = self.last_used_ms.load(Ordering::Relaxed);
        Duration::from_millis(now_ms.saturating_sub(last).max(0) as u64)
    }

    /// Move to `Deleted`, dropping the index and cancelling any build
    fn tombstone(&mut self) {
        self.status = StoreStatus::Deleted;
        self.index = None;
        self.updated_at = Utc::now();
        self.build_token.cancel();
    }
}

/// Registry of vector stores, shared as `Arc<StoreRegistry>`
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, StoreRecord>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh identifier and insert a `Building` record
    pub async fn create(&self, source_name: Option<String>) -> String {
        let mut stores = self.stores.write().await;

        let mut id = Uuid::new_v4().to_string();
        while stores.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }

        let now = Utc::now();
        stores.insert(
            id.clone(),
            StoreRecord {
                source_name,
                status: StoreStatus::Building,
                index: None,
                failure: None,
                created_at: now,
                updated_at: now,
                last_used_ms: AtomicI64::new(now.timestamp_millis()),
                build_token: CancellationToken::new(),
            },
        );

        info!(store_id = %id, "Vector store created (building)");
        id
    }

    /// `Building -> Available`
    pub async fn complete_build(&self, id: &str, index: VectorIndex) -> RagResult<()> {
        let mut stores = self.stores.write().await;
        let record = stores
            .get_mut(id)
            .ok_or_else(|| RagError::NotFound(id.to_string()))?;

        if record.status != StoreStatus::Building {
            let err = RagError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                to: StoreStatus::Available,
            };
            log_rejected_transition(record.status, &err);
            return Err(err);
        }

        let chunk_count = index.len();
        record.status = StoreStatus::Available;
        record.index = Some(Arc::new(index));
        record.updated_at = Utc::now();
        record.touch();

        info!(store_id = %id, chunk_count, "Vector store available");
        Ok(())
    }

    /// `Building -> Failed`, recording the cause
    pub async fn mark_failed(&self, id: &str, cause: &RagError) -> RagResult<()> {
        let mut stores = self.stores.write().await;
        let record = stores
            .get_mut(id)
            .ok_or_else(|| RagError::NotFound(id.to_string()))?;

        if record.status != StoreStatus::Building {
            let err = RagError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                to: StoreStatus::Failed,
            };
            log_rejected_transition(record.status, &err);
            return Err(err);
        }

        record.status = StoreStatus::Failed;
        record.failure = Some(StoreFailure::from(cause));
        record.updated_at = Utc::now();

        warn!(store_id = %id, code = cause.error_code(), "Vector store build failed: {}", cause);
        Ok(())
    }

    /// Snapshot of a live store; `NotFound` for unknown or deleted ids
    pub async fn get(&self, id: &str) -> RagResult<Store> {
        let stores = self.stores.read().await;
        match stores.get(id) {
            Some(record) if record.status != StoreStatus::Deleted => {
                record.touch();
                Ok(record.snapshot(id))
            }
            _ => Err(RagError::NotFound(id.to_string())),
        }
    }

    /// Any live state -> `Deleted`
    pub async fn delete(&self, id: &str) -> RagResult<()> {
        let mut stores = self.stores.write().await;
        match stores.get_mut(id) {
            Some(record) if record.status != StoreStatus::Deleted => {
                let previous = record.status;
                record.tombstone();
                info!(store_id = %id, previous = %previous, "Vector store deleted");
                Ok(())
            }
            _ => Err(RagError::NotFound(id.to_string())),
        }
    }

    /// Summaries of all live stores, ordered by id
    pub async fn list(&self) -> BTreeMap<String, StoreSummary> {
        let stores = self.stores.read().await;
        stores
            .iter()
            .filter(|(_, record)| record.status != StoreStatus::Deleted)
            .map(|(id, record)| (id.clone(), record.summary(id)))
            .collect()
    }

    /// Cancellation token for the store's in-flight build
    pub async fn build_token(&self, id: &str) -> RagResult<CancellationToken> {
        let stores = self.stores.read().await;
        stores
            .get(id)
            .map(|record| record.build_token.clone())
            .ok_or_else(|| RagError::NotFound(id.to_string()))
    }

    /// Delete `Available` stores not looked up for longer than `ttl`
    pub async fn evict_idle(&self, ttl: Duration) -> Vec<String> {
        let now_ms = Utc::now().timestamp_millis();
        let mut stores = self.stores.write().await;

        let mut evicted: Vec<String> = stores
            .iter_mut()
            .filter(|(_, record)| {
                record.status == StoreStatus::Available && record.idle_for(now_ms) > ttl
            })
            .map(|(id, record)| {
                record.tombstone();
                id.clone()
            })
            .collect();
        evicted.sort();

        if !evicted.is_empty() {
            info!(count = evicted.len(), "Evicted idle vector stores");
        }
        evicted
    }

    /// Number of stores that are not deleted
    pub async fn active_count(&self) -> usize {
        let stores = self.stores.read().await;
        stores
            .values()
            .filter(|record| record.status != StoreStatus::Deleted)
            .count()
    }
}

fn log_rejected_transition(current: StoreStatus, err: &RagError) {
    if current == StoreStatus::Deleted {
        // Store deleted while its build was still running
        warn!("{}", err);
    } else {
        error!("Invariant violation: {}", err);
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`SessionWorkerRepository`] backed by a `HashMap`. This is the
//! only repository adapter in this crate; a durable backend would
//! implement the same trait against a real store, matching the index
//! layout called out in the persisted-state contract.

use crate::repository::{
    filter_idle_running, filter_long_stopped, filter_stale_sync_candidates, RepositoryError,
    SessionWorkerRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rf_core::{SessionId, SessionWorker};
use std::collections::HashMap;

/// `SessionWorkerRepository` over a `parking_lot::RwLock<HashMap<..>>`.
/// All mutation is a full upsert; all reads clone out records so callers
/// can never observe or corrupt the stored copy.
#[derive(Debug, Default)]
pub struct InMemorySessionWorkerRepository {
    workers: RwLock<HashMap<SessionId, SessionWorker>>,
}

impl InMemorySessionWorkerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored, for test assertions.
    pub fn len(&self) -> usize {
        self.workers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionWorkerRepository for InMemorySessionWorkerRepository {
    async fn find_by_session_id(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionWorker>, RepositoryError> {
        Ok(self.workers.read().get(id).cloned())
    }

    async fn save(&self, worker: SessionWorker) -> Result<(), RepositoryError> {
        self.workers.write().insert(worker.session_id.clone(), worker);
        Ok(())
    }

    async fn list_idle_running(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionWorker>, RepositoryError> {
        let workers = self.workers.read();
        Ok(filter_idle_running(workers.values().cloned(), cutoff, limit))
    }

    async fn list_long_stopped(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionWorker>, RepositoryError> {
        let workers = self.workers.read();
        Ok(filter_long_stopped(workers.values().cloned(), cutoff, limit))
    }

    async fn list_stale_sync_candidates(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionWorker>, RepositoryError> {
        let workers = self.workers.read();
        Ok(filter_stale_sync_candidates(
            workers.values().cloned(),
            cutoff,
            limit,
        ))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

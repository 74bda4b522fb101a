// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session worker lifecycle manager: binds a session to a container
//! through the container driver, executor client, and repository ports,
//! guaranteeing at-most-one in-flight transition per session.

use crate::retry::{retry_transient, RetryConfig};
use crate::session_lock::SessionLockMap;
use chrono::{DateTime, Utc};
use rf_adapters::{ContainerDriver, ContainerError, ExecutorClient, ExecutorError};
use rf_core::{Clock, ContainerId, SessionId, SessionWorker, SyncStatus, WorkerState, WorkspacePlan};
use rf_storage::{RepositoryError, SessionWorkerRepository};
use std::sync::Arc;
use thiserror::Error;

/// Errors from lifecycle manager operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The session worker has already reached the terminal `deleted`
    /// state; every further operation on it is rejected.
    #[error("session worker {0} already deleted")]
    WorkerDeleted(SessionId),
    #[error("no session worker found for {0}")]
    NotFound(SessionId),
    #[error("workspace restore failed: {0}")]
    RestoreFailed(String),
    #[error("workspace validation failed, missing required paths: {0:?}")]
    ValidationFailed(Vec<String>),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Only `ContainerError::Transient` is retried (§7); `NotFound` and any
/// other kind surface immediately.
fn is_transient_container_error(err: &ContainerError) -> bool {
    matches!(err, ContainerError::Transient(_))
}

/// Binds sessions to containers: the public surface described by the
/// state machine table (provisioning → running → stopped → deleted).
pub struct SessionWorkerLifecycle<D, B, R, C> {
    containers: D,
    executor: B,
    repository: Arc<R>,
    clock: C,
    retry_config: RetryConfig,
    locks: SessionLockMap,
}

impl<D, B, R, C> SessionWorkerLifecycle<D, B, R, C>
where
    D: ContainerDriver,
    B: ExecutorClient,
    R: SessionWorkerRepository,
    C: Clock,
{
    pub fn new(containers: D, executor: B, repository: Arc<R>, clock: C) -> Self {
        Self::with_retry_config(containers, executor, repository, clock, RetryConfig::default())
    }

    pub fn with_retry_config(
        containers: D,
        executor: B,
        repository: Arc<R>,
        clock: C,
        retry_config: RetryConfig,
    ) -> Self {
        Self {
            containers,
            executor,
            repository,
            clock,
            retry_config,
            locks: SessionLockMap::new(),
        }
    }

    /// Idempotently produces a worker in state `running` whose workspace
    /// matches `plan.fingerprint`.
    pub async fn ensure_running(
        &self,
        session_id: SessionId,
        plan: WorkspacePlan,
    ) -> Result<SessionWorker, LifecycleError> {
        tracing::info!(%session_id, "ensure_running");
        let _lock = self.locks.acquire(&session_id).await;

        let existing = self.repository.find_by_session_id(&session_id).await?;

        match existing {
            None => {
                let now = self.clock.now();
                let worker = SessionWorker::provisioning(session_id, now);
                self.provision(worker, &plan).await
            }
            Some(worker) if worker.state == WorkerState::Deleted => {
                Err(LifecycleError::WorkerDeleted(worker.session_id))
            }
            Some(mut worker) if worker.state == WorkerState::Running => {
                if worker.restore_plan_fingerprint == plan.fingerprint {
                    worker.last_active_at = self.clock.now();
                    self.repository.save(worker.clone()).await?;
                    Ok(worker)
                } else {
                    self.resync_running(worker, &plan).await
                }
            }
            Some(mut worker) => {
                // stopped or (unexpectedly) still provisioning: allocate fresh.
                worker.state = WorkerState::Provisioning;
                worker.container_id = None;
                self.provision(worker, &plan).await
            }
        }
    }

    /// Allocates a fresh container, starts it, links in the session's
    /// persistent agent data, and syncs the workspace. On any failure the
    /// partial container is rolled back best-effort and the worker is left
    /// `stopped` with `lastSyncStatus=failed`.
    async fn provision(
        &self,
        mut worker: SessionWorker,
        plan: &WorkspacePlan,
    ) -> Result<SessionWorker, LifecycleError> {
        self.repository.save(worker.clone()).await?;

        let container_id = match retry_transient(
            &self.retry_config,
            || self.containers.create_worker(),
            is_transient_container_error,
        )
        .await
        {
            Ok(id) => id,
            Err(err) => return self.fail_provisioning(worker, None, err.into()).await,
        };

        if let Err(err) = retry_transient(
            &self.retry_config,
            || self.containers.start(&container_id),
            is_transient_container_error,
        )
        .await
        {
            return self.fail_provisioning(worker, Some(container_id), err.into()).await;
        }

        worker.container_id = Some(container_id.clone());

        if let Err(err) = self.executor.link_agent_data(&container_id).await {
            return self
                .fail_provisioning(worker, Some(container_id), LifecycleError::Executor(err))
                .await;
        }

        match self.sync_workspace(&container_id, plan).await {
            Ok(()) => {
                worker.state = WorkerState::Running;
                worker.last_active_at = self.clock.now();
                worker.last_sync_status = SyncStatus::Succeeded;
                worker.last_sync_at = Some(self.clock.now());
                worker.restore_plan_fingerprint = plan.fingerprint;
                self.repository.save(worker.clone()).await?;
                Ok(worker)
            }
            Err(err) => self.fail_provisioning(worker, Some(container_id), err).await,
        }
    }

    /// Re-syncs the workspace of an already-running worker whose plan has
    /// drifted. On failure the container is torn down and the worker moves
    /// to `stopped`, mirroring a fresh provisioning failure.
    #[allow(clippy::expect_used)]
    async fn resync_running(
        &self,
        mut worker: SessionWorker,
        plan: &WorkspacePlan,
    ) -> Result<SessionWorker, LifecycleError> {
        let container_id = worker
            .container_id
            .clone()
            .expect("invariant: running worker always has a container id");

        match self.sync_workspace(&container_id, plan).await {
            Ok(()) => {
                worker.last_active_at = self.clock.now();
                worker.last_sync_status = SyncStatus::Succeeded;
                worker.last_sync_at = Some(self.clock.now());
                worker.restore_plan_fingerprint = plan.fingerprint;
                self.repository.save(worker.clone()).await?;
                Ok(worker)
            }
            Err(err) => self.fail_provisioning(worker, Some(container_id), err).await,
        }
    }

    /// Runs restore + validate, setting `lastSyncStatus=running` before and
    /// `succeeded`/`failed` after so concurrent stale-sync sweeps never
    /// double-dispatch against the same worker.
    async fn sync_workspace(
        &self,
        container_id: &ContainerId,
        plan: &WorkspacePlan,
    ) -> Result<(), LifecycleError> {
        self.executor
            .restore_workspace(container_id, plan)
            .await
            .map_err(|err| match err {
                ExecutorError::RestoreFailed(reason) => LifecycleError::RestoreFailed(reason),
                other => LifecycleError::Executor(other),
            })?;

        let validation = self.executor.validate_workspace(container_id, plan).await?;
        if !validation.ok {
            return Err(LifecycleError::ValidationFailed(validation.missing_required_paths));
        }
        Ok(())
    }

    /// Best-effort rollback of a partial container, leaving the worker
    /// `stopped` with `lastSyncStatus=failed`, then propagates `cause`.
    async fn fail_provisioning(
        &self,
        mut worker: SessionWorker,
        container_id: Option<ContainerId>,
        cause: LifecycleError,
    ) -> Result<SessionWorker, LifecycleError> {
        if let Some(id) = &container_id {
            let _ = self.containers.stop(id).await;
            let _ = self.containers.remove(id).await;
        }
        worker.container_id = None;
        worker.state = WorkerState::Stopped;
        worker.stopped_at = Some(self.clock.now());
        worker.last_sync_status = SyncStatus::Failed;
        self.repository.save(worker).await?;
        Err(cause)
    }

    /// Transitions to `stopped`, stopping the container if present.
    /// Idempotent: stopping an already-stopped worker is a no-op.
    pub async fn stop(&self, session_id: &SessionId) -> Result<SessionWorker, LifecycleError> {
        let _lock = self.locks.acquire(session_id).await;

        let mut worker = self
            .repository
            .find_by_session_id(session_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(session_id.clone()))?;

        match worker.state {
            WorkerState::Deleted => Err(LifecycleError::WorkerDeleted(session_id.clone())),
            WorkerState::Stopped => Ok(worker),
            WorkerState::Running | WorkerState::Provisioning => {
                if let Some(id) = &worker.container_id {
                    let _ = self.containers.stop(id).await;
                }
                worker.state = WorkerState::Stopped;
                worker.stopped_at = Some(self.clock.now());
                self.repository.save(worker.clone()).await?;
                Ok(worker)
            }
        }
    }

    /// Terminal removal. Idempotent after success; a missing worker is
    /// treated as already deleted.
    pub async fn delete(&self, session_id: &SessionId) -> Result<(), LifecycleError> {
        let _lock = self.locks.acquire(session_id).await;

        let Some(mut worker) = self.repository.find_by_session_id(session_id).await? else {
            return Ok(());
        };
        if worker.state == WorkerState::Deleted {
            return Ok(());
        }

        if let Some(id) = &worker.container_id {
            let _ = self.containers.stop(id).await;
            let _ = self.containers.remove(id).await;
        }
        worker.container_id = None;
        worker.state = WorkerState::Deleted;
        if worker.stopped_at.is_none() {
            worker.stopped_at = Some(self.clock.now());
        }
        self.repository.save(worker).await?;
        Ok(())
    }

    /// Stops running workers idle beyond `cutoff`. Returns the sessions
    /// actually stopped; a candidate whose state changed between the
    /// repository query and the per-session lock is skipped.
    pub async fn sweep_idle(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionId>, LifecycleError> {
        let candidates = self.repository.list_idle_running(cutoff, limit).await?;
        let mut stopped = Vec::new();
        for candidate in candidates {
            let _lock = self.locks.acquire(&candidate.session_id).await;
            let Some(worker) = self.repository.find_by_session_id(&candidate.session_id).await? else {
                continue;
            };
            if worker.state != WorkerState::Running || worker.last_active_at >= cutoff {
                continue;
            }
            drop(_lock);
            match self.stop(&worker.session_id).await {
                Ok(_) => stopped.push(worker.session_id),
                Err(err) => tracing::warn!(session_id = %worker.session_id, error = %err, "idle sweep stop failed"),
            }
        }
        Ok(stopped)
    }

    /// Deletes stopped workers older than `cutoff`.
    pub async fn sweep_long_stopped(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionId>, LifecycleError> {
        let candidates = self.repository.list_long_stopped(cutoff, limit).await?;
        let mut deleted = Vec::new();
        for candidate in candidates {
            let _lock = self.locks.acquire(&candidate.session_id).await;
            let Some(worker) = self.repository.find_by_session_id(&candidate.session_id).await? else {
                continue;
            };
            let still_applicable = worker.state == WorkerState::Stopped
                && worker.stopped_at.is_some_and(|stopped_at| stopped_at < cutoff);
            if !still_applicable {
                continue;
            }
            drop(_lock);
            match self.delete(&worker.session_id).await {
                Ok(()) => deleted.push(worker.session_id),
                Err(err) => tracing::warn!(session_id = %worker.session_id, error = %err, "long-stopped sweep delete failed"),
            }
        }
        Ok(deleted)
    }

    /// Re-runs workspace sync for sync-stale workers that currently have a
    /// container. Workers with no container yet (fresh or already torn
    /// down) are left for the next `ensureRunning` call to resync.
    pub async fn sweep_stale_sync(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionId>, LifecycleError> {
        let candidates = self.repository.list_stale_sync_candidates(cutoff, limit).await?;
        let mut synced = Vec::new();
        for candidate in candidates {
            let _lock = self.locks.acquire(&candidate.session_id).await;
            let Some(mut worker) = self.repository.find_by_session_id(&candidate.session_id).await? else {
                continue;
            };
            let still_applicable = worker.state != WorkerState::Deleted
                && worker.last_sync_status != SyncStatus::Running
                && worker.last_sync_at.is_none_or(|last_sync_at| last_sync_at < cutoff);
            if !still_applicable {
                continue;
            }
            let Some(container_id) = worker.container_id.clone() else {
                continue;
            };

            worker.last_sync_status = SyncStatus::Running;
            self.repository.save(worker.clone()).await?;

            let plan = WorkspacePlan::new(worker.restore_plan_fingerprint, serde_json::Value::Null);
            match self.sync_workspace(&container_id, &plan).await {
                Ok(()) => {
                    worker.last_sync_status = SyncStatus::Succeeded;
                    worker.last_sync_at = Some(self.clock.now());
                    self.repository.save(worker.clone()).await?;
                    synced.push(worker.session_id);
                }
                Err(err) => {
                    worker.last_sync_status = SyncStatus::Failed;
                    worker.last_sync_at = Some(self.clock.now());
                    self.repository.save(worker.clone()).await?;
                    tracing::warn!(session_id = %worker.session_id, error = %err, "stale-sync resync failed");
                }
            }
        }
        Ok(synced)
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "lifecycle_proptest.rs"]
mod proptest_tests;

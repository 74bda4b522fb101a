// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session worker repository: persists [`SessionWorker`] records keyed by
//! `sessionId` and serves the sweeper index queries the lifecycle manager
//! polls on a schedule.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rf_core::{SessionId, SessionWorker, SyncStatus, WorkerState};
use thiserror::Error;

/// Errors from repository operations. The in-memory implementation never
/// produces these; they exist for adapters backed by real storage.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence and index-query contract for [`SessionWorker`] records.
///
/// All reads and the three sweeper queries return defensive copies: callers
/// may freely mutate what they get back without affecting stored state.
#[async_trait]
pub trait SessionWorkerRepository: Send + Sync {
    /// Look up a worker by its session id. Returns `None` if absent.
    async fn find_by_session_id(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionWorker>, RepositoryError>;

    /// Last-writer-wins upsert keyed by `sessionId`.
    async fn save(&self, worker: SessionWorker) -> Result<(), RepositoryError>;

    /// Workers with `state=running ∧ lastActiveAt < cutoff`, ordered by
    /// `lastActiveAt` ascending, truncated to `limit` (a negative limit is
    /// treated as zero).
    async fn list_idle_running(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionWorker>, RepositoryError>;

    /// Workers with `state=stopped ∧ stoppedAt < cutoff`, ordered by
    /// `stoppedAt` ascending, truncated to `limit`.
    async fn list_long_stopped(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionWorker>, RepositoryError>;

    /// Workers with `state ≠ deleted ∧ lastSyncStatus ≠ running ∧
    /// (lastSyncAt = null ∨ lastSyncAt < cutoff)`, ordered by `lastSyncAt`
    /// ascending with null treated as the oldest possible value.
    async fn list_stale_sync_candidates(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SessionWorker>, RepositoryError>;
}

/// Caps a possibly-negative limit to a non-negative `usize`.
fn cap_limit(limit: i64) -> usize {
    limit.max(0) as usize
}

pub(crate) fn filter_idle_running(
    workers: impl Iterator<Item = SessionWorker>,
    cutoff: DateTime<Utc>,
    limit: i64,
) -> Vec<SessionWorker> {
    let mut matched: Vec<SessionWorker> = workers
        .filter(|w| w.state == WorkerState::Running && w.last_active_at < cutoff)
        .collect();
    matched.sort_by_key(|w| w.last_active_at);
    matched.truncate(cap_limit(limit));
    matched
}

pub(crate) fn filter_long_stopped(
    workers: impl Iterator<Item = SessionWorker>,
    cutoff: DateTime<Utc>,
    limit: i64,
) -> Vec<SessionWorker> {
    let mut matched: Vec<SessionWorker> = workers
        .filter(|w| {
            w.state == WorkerState::Stopped
                && w.stopped_at.is_some_and(|stopped_at| stopped_at < cutoff)
        })
        .collect();
    matched.sort_by_key(|w| w.stopped_at);
    matched.truncate(cap_limit(limit));
    matched
}

pub(crate) fn filter_stale_sync_candidates(
    workers: impl Iterator<Item = SessionWorker>,
    cutoff: DateTime<Utc>,
    limit: i64,
) -> Vec<SessionWorker> {
    let mut matched: Vec<SessionWorker> = workers
        .filter(|w| {
            w.state != WorkerState::Deleted
                && w.last_sync_status != SyncStatus::Running
                && w.last_sync_at.is_none_or(|last_sync_at| last_sync_at < cutoff)
        })
        .collect();
    // Null lastSyncAt sorts as the oldest possible value.
    matched.sort_by_key(|w| w.last_sync_at.unwrap_or(DateTime::<Utc>::MIN_UTC));
    matched.truncate(cap_limit(limit));
    matched
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SessionWorker`: the authoritative per-session record owned by the
//! session worker lifecycle manager.

use crate::container::ContainerId;
use crate::session::SessionId;
use crate::workspace::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session worker.
///
/// `Deleted` is terminal: no transition leads out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Provisioning,
    Running,
    Stopped,
    Deleted,
}

impl WorkerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerState::Deleted)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkerState::Provisioning => "provisioning",
            WorkerState::Running => "running",
            WorkerState::Stopped => "stopped",
            WorkerState::Deleted => "deleted",
        };
        write!(f, "{s}")
    }
}

/// Status of the most recent workspace sync (restore + validate) attempt.
///
/// `Running` excludes the record from stale-sync sweeps regardless of
/// `last_sync_at`, so concurrent stale-sync sweeps never double-dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Never,
    Running,
    Succeeded,
    Failed,
}

/// The authoritative per-session record.
///
/// Mutated only inside the lifecycle manager's per-session critical
/// section; every value handed back from the repository or the manager is
/// an independent clone (see deep-snapshot discipline in `rf-storage`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWorker {
    pub session_id: SessionId,
    pub container_id: Option<ContainerId>,
    pub state: WorkerState,
    pub last_active_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_sync_status: SyncStatus,
    pub restore_plan_fingerprint: Fingerprint,
}

impl SessionWorker {
    /// Construct the initial `provisioning` record for a fresh session.
    pub fn provisioning(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            container_id: None,
            state: WorkerState::Provisioning,
            last_active_at: now,
            stopped_at: None,
            last_sync_at: None,
            last_sync_status: SyncStatus::Never,
            restore_plan_fingerprint: Fingerprint::default(),
        }
    }

    /// Checks the invariants from the data model: `running` implies a
    /// container id, and `stopped_at` is set if and only if the state is
    /// `stopped` or `deleted`.
    pub fn invariants_hold(&self) -> bool {
        if self.state == WorkerState::Running && self.container_id.is_none() {
            return false;
        }
        match self.state {
            WorkerState::Stopped | WorkerState::Deleted => self.stopped_at.is_some(),
            _ => self.stopped_at.is_none(),
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;

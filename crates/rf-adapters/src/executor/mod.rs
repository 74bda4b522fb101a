// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor client: the capability surface for restoring a workspace
//! inside a running container and validating that the restore landed the
//! paths the agent needs.

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecutorCall, FakeExecutorClient};

pub mod noop;
pub use noop::NoopExecutorClient;

use async_trait::async_trait;
use rf_core::{ContainerId, WorkspacePlan};
use thiserror::Error;

/// Errors from executor client operations.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("workspace restore failed: {0}")]
    RestoreFailed(String),
    #[error("agent data link failed: {0}")]
    LinkFailed(String),
}

/// Result of validating that a workspace restore produced the paths the
/// agent run needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidateResult {
    pub ok: bool,
    pub missing_required_paths: Vec<String>,
}

/// Adapter for restoring a workspace plan into a container and linking in
/// durable agent data (conversation history, credentials cache, ...).
#[async_trait]
pub trait ExecutorClient: Clone + Send + Sync + 'static {
    /// Apply a [`WorkspacePlan`]'s restore instructions inside the
    /// container. Failure here rolls the worker back to `stopped`.
    async fn restore_workspace(
        &self,
        container_id: &ContainerId,
        plan: &WorkspacePlan,
    ) -> Result<(), ExecutorError>;

    /// Link persistent per-session agent data into the container's
    /// workspace. Independent of `restore_workspace`.
    async fn link_agent_data(&self, container_id: &ContainerId) -> Result<(), ExecutorError>;

    /// Check that `plan.required_paths` exist in the restored workspace.
    async fn validate_workspace(
        &self,
        container_id: &ContainerId,
        plan: &WorkspacePlan,
    ) -> Result<ValidateResult, ExecutorError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{ExecutorClient, ExecutorError, ValidateResult};
use async_trait::async_trait;
use rf_core::{ContainerId, WorkspacePlan};

/// An [`ExecutorClient`] that performs no real restore and always reports
/// success. Useful as a placeholder before a real backend is wired up, or
/// for workers whose workspace plan carries no restore instructions.
///
/// `validate_workspace` never fails the check: it reports `ok: true`
/// unconditionally, but logs a warning if the plan names required paths,
/// since a no-op executor cannot actually have produced them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExecutorClient;

impl NoopExecutorClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecutorClient for NoopExecutorClient {
    async fn restore_workspace(
        &self,
        _container_id: &ContainerId,
        _plan: &WorkspacePlan,
    ) -> Result<(), ExecutorError> {
        Ok(())
    }

    async fn link_agent_data(&self, _container_id: &ContainerId) -> Result<(), ExecutorError> {
        Ok(())
    }

    async fn validate_workspace(
        &self,
        container_id: &ContainerId,
        plan: &WorkspacePlan,
    ) -> Result<ValidateResult, ExecutorError> {
        if !plan.required_paths.is_empty() {
            tracing::warn!(
                container_id = %container_id,
                required_paths = ?plan.required_paths,
                "noop executor cannot validate required paths; reporting ok anyway"
            );
        }
        Ok(ValidateResult {
            ok: true,
            missing_required_paths: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;

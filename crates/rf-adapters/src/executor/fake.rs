// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{ExecutorClient, ExecutorError, ValidateResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use rf_core::{ContainerId, WorkspacePlan};
use std::collections::HashSet;
use std::sync::Arc;

/// A single recorded call against a [`FakeExecutorClient`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorCall {
    RestoreWorkspace(ContainerId, rf_core::Fingerprint),
    LinkAgentData(ContainerId),
    ValidateWorkspace(ContainerId, rf_core::Fingerprint),
}

#[derive(Debug, Default)]
struct FakeExecutorState {
    calls: Vec<ExecutorCall>,
    /// Containers for which `restore_workspace` should fail next time.
    fail_restore: HashSet<ContainerId>,
    /// Containers for which `link_agent_data` should fail next time.
    fail_link: HashSet<ContainerId>,
    /// Paths that `validate_workspace` should report missing regardless
    /// of the plan's required_paths.
    missing_paths: Vec<String>,
}

/// An in-memory [`ExecutorClient`] for tests. Records every call and lets
/// tests script a restore failure or missing required paths.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutorClient {
    state: Arc<Mutex<FakeExecutorState>>,
}

impl FakeExecutorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.state.lock().calls.clone()
    }

    /// Makes the next `restore_workspace` call for `container_id` fail.
    pub fn fail_restore_for(&self, container_id: ContainerId) {
        self.state.lock().fail_restore.insert(container_id);
    }

    /// Makes the next `link_agent_data` call for `container_id` fail.
    pub fn fail_link_for(&self, container_id: ContainerId) {
        self.state.lock().fail_link.insert(container_id);
    }

    /// Makes `validate_workspace` report these paths missing.
    pub fn set_missing_paths(&self, paths: Vec<String>) {
        self.state.lock().missing_paths = paths;
    }
}

#[async_trait]
impl ExecutorClient for FakeExecutorClient {
    async fn restore_workspace(
        &self,
        container_id: &ContainerId,
        plan: &WorkspacePlan,
    ) -> Result<(), ExecutorError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(ExecutorCall::RestoreWorkspace(container_id.clone(), plan.fingerprint));
        if state.fail_restore.remove(container_id) {
            return Err(ExecutorError::RestoreFailed(format!(
                "scripted failure for {container_id}"
            )));
        }
        Ok(())
    }

    async fn link_agent_data(&self, container_id: &ContainerId) -> Result<(), ExecutorError> {
        let mut state = self.state.lock();
        state.calls.push(ExecutorCall::LinkAgentData(container_id.clone()));
        if state.fail_link.remove(container_id) {
            return Err(ExecutorError::LinkFailed(format!(
                "scripted failure for {container_id}"
            )));
        }
        Ok(())
    }

    async fn validate_workspace(
        &self,
        container_id: &ContainerId,
        plan: &WorkspacePlan,
    ) -> Result<ValidateResult, ExecutorError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(ExecutorCall::ValidateWorkspace(container_id.clone(), plan.fingerprint));
        let missing: Vec<String> = plan
            .required_paths
            .iter()
            .filter(|p| state.missing_paths.contains(p))
            .cloned()
            .collect();
        Ok(ValidateResult {
            ok: missing.is_empty(),
            missing_required_paths: missing,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

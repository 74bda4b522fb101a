// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{ContainerDriver, ContainerError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rf_core::ContainerId;
use std::collections::HashMap;
use std::sync::Arc;

/// A single recorded call against a [`FakeContainerDriver`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerCall {
    CreateWorker,
    Start(ContainerId),
    Stop(ContainerId),
    Remove(ContainerId),
    Exists(ContainerId),
}

#[derive(Debug, Default)]
struct FakeContainerState {
    /// Known containers and whether each is currently running.
    containers: HashMap<ContainerId, bool>,
    calls: Vec<ContainerCall>,
    next_id: u64,
}

/// An in-memory [`ContainerDriver`] for tests. Records every call and lets
/// tests script transient failures via [`FakeContainerDriver::fail_next`].
#[derive(Debug, Clone, Default)]
pub struct FakeContainerDriver {
    state: Arc<Mutex<FakeContainerState>>,
    fail_next: Arc<Mutex<Option<ContainerError>>>,
}

impl FakeContainerDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the next call to return the given error instead of
    /// succeeding. Consumed after one use.
    pub fn fail_next(&self, err: ContainerError) {
        *self.fail_next.lock() = Some(err);
    }

    fn take_failure(&self) -> Option<ContainerError> {
        self.fail_next.lock().take()
    }

    pub fn calls(&self) -> Vec<ContainerCall> {
        self.state.lock().calls.clone()
    }

    /// Whether the fake currently considers this container running.
    pub fn is_running(&self, id: &ContainerId) -> Option<bool> {
        self.state.lock().containers.get(id).copied()
    }

    /// Seeds a container directly, bypassing `create_worker`.
    pub fn seed(&self, id: ContainerId, running: bool) {
        self.state.lock().containers.insert(id, running);
    }
}

#[async_trait]
impl ContainerDriver for FakeContainerDriver {
    async fn create_worker(&self) -> Result<ContainerId, ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(ContainerCall::CreateWorker);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        state.next_id += 1;
        let id = ContainerId::new(format!("fake-container-{}", state.next_id));
        state.containers.insert(id.clone(), false);
        Ok(id)
    }

    async fn start(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(ContainerCall::Start(id.clone()));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        match state.containers.get_mut(id) {
            Some(running) => {
                *running = true;
                Ok(())
            }
            None => Err(ContainerError::NotFound(id.clone())),
        }
    }

    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(ContainerCall::Stop(id.clone()));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        match state.containers.get_mut(id) {
            Some(running) => {
                *running = false;
                Ok(())
            }
            None => Err(ContainerError::NotFound(id.clone())),
        }
    }

    async fn remove(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(ContainerCall::Remove(id.clone()));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        state.containers.remove(id);
        Ok(())
    }

    async fn exists(&self, id: &ContainerId) -> Result<bool, ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(ContainerCall::Exists(id.clone()));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(state.containers.contains_key(id))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

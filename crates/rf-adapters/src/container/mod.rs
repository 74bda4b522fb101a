// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container driver: the capability surface over the worker container
//! runtime (Docker, Kubernetes, ...). Concrete drivers are out of scope
//! for this crate — only the contract and a fake for testing live here.

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ContainerCall, FakeContainerDriver};

use async_trait::async_trait;
use rf_core::ContainerId;
use thiserror::Error;

/// Errors from container driver operations.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(ContainerId),
    /// A transient failure the lifecycle manager should retry (§4.D
    /// failure semantics: 3 attempts, exponential backoff).
    #[error("transient container error: {0}")]
    Transient(String),
}

/// Adapter for provisioning and controlling worker containers.
///
/// `start`/`stop` are idempotent from the caller's perspective: starting an
/// already-running container and stopping an already-stopped one succeed
/// as no-ops. `remove` is silent on an unknown id. Only `createWorker`'s
/// freshness is guaranteed; it does not dedupe.
#[async_trait]
pub trait ContainerDriver: Clone + Send + Sync + 'static {
    /// Create a container in the `stopped` state and return its id.
    async fn create_worker(&self) -> Result<ContainerId, ContainerError>;

    /// Start a container. No-op if already running.
    async fn start(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop a container. No-op if already stopped.
    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Remove a container regardless of state. Silent on unknown id.
    async fn remove(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Whether a container with this id currently exists.
    async fn exists(&self, id: &ContainerId) -> Result<bool, ContainerError>;
}

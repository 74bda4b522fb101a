// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace restoration plans.
//!
//! A `WorkspacePlan` carries the instructions the executor client uses to
//! restore a session's workspace inside a container. The lifecycle manager
//! never interprets plan contents itself — only the `fingerprint`, which it
//! uses to detect drift between the plan last applied and the plan a new
//! `ensure_running` call asks for.

use serde::{Deserialize, Serialize};

/// A 32-byte content digest identifying workspace plan identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Workspace restoration instructions, opaque beyond their fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspacePlan {
    pub fingerprint: Fingerprint,
    /// Adapter-specific restore instructions; the core and the lifecycle
    /// manager pass this through to `ExecutorClient::restore_workspace`
    /// without interpreting it.
    pub instructions: serde_json::Value,
    /// Paths `ExecutorClient::validate_workspace` must find present after
    /// restore for the workspace to be considered valid.
    pub required_paths: Vec<String>,
}

impl WorkspacePlan {
    pub fn new(fingerprint: Fingerprint, instructions: serde_json::Value) -> Self {
        Self {
            fingerprint,
            instructions,
            required_paths: Vec::new(),
        }
    }

    pub fn with_required_paths(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.required_paths = paths.into_iter().collect();
        self
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;

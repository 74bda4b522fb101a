// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::container::ContainerId;
use crate::session::SessionId;
use crate::stream::{ProviderStreamChunk, RunStatus, TodoStatus};
use crate::workspace::{Fingerprint, WorkspacePlan};
use chrono::{DateTime, Utc};

/// A fixed, deterministic "now" for tests that don't care about wall time.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// A fingerprint derived from a short label, for readable test fixtures.
pub fn fingerprint(label: &str) -> Fingerprint {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(label.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Fingerprint::new(bytes)
}

pub fn plan(label: &str) -> WorkspacePlan {
    WorkspacePlan::new(fingerprint(label), serde_json::json!({ "label": label }))
}

pub fn session(id: &str) -> SessionId {
    SessionId::new(id)
}

pub fn container(id: &str) -> ContainerId {
    ContainerId::new(id)
}

pub fn message_delta(text: &str) -> ProviderStreamChunk {
    ProviderStreamChunk::MessageDelta {
        text: text.to_string(),
    }
}

pub fn todo_update(todo_id: &str, status: TodoStatus, order: u32) -> ProviderStreamChunk {
    ProviderStreamChunk::TodoUpdate {
        todo_id: todo_id.to_string(),
        content: todo_id.to_string(),
        status,
        order,
    }
}

pub fn run_finished(status: RunStatus) -> ProviderStreamChunk {
    ProviderStreamChunk::RunFinished {
        status,
        reason: None,
        usage: None,
    }
}

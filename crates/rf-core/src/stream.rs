// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run stream event types.
//!
//! `ProviderStreamChunk` is the payload type carried by the run stream bus
//! (`rf-engine::stream_bus`); `StreamEnvelope` wraps a chunk with the
//! per-stream sequence number the bus assigns on publish.

use serde::{Deserialize, Serialize};

/// One delivered event, carrying its per-stream sequence number.
///
/// `seq` is unique within a stream and strictly increasing; it is the only
/// signal a subscriber has for detecting a gap caused by buffer eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEnvelope<T> {
    pub seq: u64,
    pub event: T,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
    Canceled,
}

/// Status of a single todo item reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Todo,
    Doing,
    Done,
    Canceled,
}

/// Token/cost accounting reported alongside `run.finished`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// A chunk of a provider's run stream.
///
/// A `RunFinished` chunk must be the last event published on a run's
/// stream; publishing anything after it is a contract violation the run
/// driver (not this type) is responsible for upholding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderStreamChunk {
    #[serde(rename = "message.delta")]
    MessageDelta { text: String },
    #[serde(rename = "todo.update")]
    TodoUpdate {
        todo_id: String,
        content: String,
        status: TodoStatus,
        order: u32,
    },
    #[serde(rename = "run.finished")]
    RunFinished {
        status: RunStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<UsageStats>,
    },
}

impl ProviderStreamChunk {
    pub fn is_finished(&self) -> bool {
        matches!(self, ProviderStreamChunk::RunFinished { .. })
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;

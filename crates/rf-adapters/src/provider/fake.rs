// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ProviderRunHandle;
use async_trait::async_trait;
use rf_core::{ProviderStreamChunk, RunStatus};
use std::collections::VecDeque;

/// A scripted [`ProviderRunHandle`] for tests: yields a fixed sequence of
/// chunks, then `None`. `stop` truncates the remaining sequence and queues
/// a `run.finished{status=canceled}` chunk if one hasn't already been
/// produced.
#[derive(Debug, Clone)]
pub struct FakeProviderRunHandle {
    chunks: VecDeque<ProviderStreamChunk>,
    stopped: bool,
}

impl FakeProviderRunHandle {
    pub fn new(chunks: impl IntoIterator<Item = ProviderStreamChunk>) -> Self {
        Self {
            chunks: chunks.into_iter().collect(),
            stopped: false,
        }
    }
}

#[async_trait]
impl ProviderRunHandle for FakeProviderRunHandle {
    async fn next_chunk(&mut self) -> Option<ProviderStreamChunk> {
        self.chunks.pop_front()
    }

    async fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.chunks.clear();
        self.chunks.push_back(ProviderStreamChunk::RunFinished {
            status: RunStatus::Canceled,
            reason: Some("stopped".to_string()),
            usage: None,
        });
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

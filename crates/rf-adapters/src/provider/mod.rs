// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider run handle: the capability surface for a single in-flight
//! provider call. Not implemented by the core itself — consumed by the
//! lifecycle manager's callers, which pump chunks into the stream bus.

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProviderRunHandle;

use async_trait::async_trait;
use rf_core::ProviderStreamChunk;

/// A lazy sequence of provider stream chunks plus a cancellation signal.
///
/// `next_chunk` returns `None` once the sequence is exhausted; the final
/// chunk before exhaustion is always a `run.finished` event. `stop` signals
/// cancellation; the handle is expected to surface a
/// `run.finished{status=canceled}` chunk within a bounded grace period
/// afterward rather than terminating the sequence abruptly.
#[async_trait]
pub trait ProviderRunHandle: Send + Sync {
    /// Await the next chunk, or `None` if the run has ended and no further
    /// chunks will arrive.
    async fn next_chunk(&mut self) -> Option<ProviderStreamChunk>;

    /// Request cancellation. Idempotent.
    async fn stop(&mut self);
}

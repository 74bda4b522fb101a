// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run identifier type.
//!
//! A run is one provider invocation producing a stream; `RunId` doubles as
//! the stream id on the [`crate::stream`] bus.

crate::define_id! {
    /// Unique identifier for a run. Also used as the stream id for the
    /// run's provider stream chunks.
    pub struct RunId;
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier type.
//!
//! A session is a logical interaction context; it has at most one worker
//! bound to it at a time. `SessionId` is the primary key of `SessionWorker`
//! (see [`crate::worker`]).

crate::define_id! {
    /// Unique identifier for a session.
    pub struct SessionId;
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

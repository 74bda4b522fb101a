// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session mutual exclusion: guarantees at-most-one in-flight
//! lifecycle transition per `sessionId` while letting different sessions
//! proceed in parallel. Entries are refcounted and reaped once no holder
//! or waiter remains.

use parking_lot::Mutex;
use rf_core::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedMutexGuard, Mutex as AsyncMutex};

#[derive(Default)]
struct Entry {
    lock: Arc<AsyncMutex<()>>,
    refcount: usize,
}

/// A map of per-session locks, handed out via [`SessionLockMap::acquire`].
#[derive(Default)]
pub struct SessionLockMap {
    entries: Mutex<HashMap<SessionId, Entry>>,
}

/// An acquired per-session lock. Dropping it releases the async mutex and
/// decrements the entry's refcount; the entry is removed from the map when
/// the refcount reaches zero.
pub struct SessionLockGuard<'a> {
    map: &'a SessionLockMap,
    session_id: SessionId,
    _guard: OwnedMutexGuard<()>,
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently tracked (held or waited on), for tests.
    pub fn tracked_sessions(&self) -> usize {
        self.entries.lock().len()
    }

    /// Acquire the exclusion primitive for `session_id`, waiting if another
    /// transition for the same session is in flight.
    pub async fn acquire(&self, session_id: &SessionId) -> SessionLockGuard<'_> {
        let lock = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(session_id.clone()).or_default();
            entry.refcount += 1;
            Arc::clone(&entry.lock)
        };

        let guard = lock.lock_owned().await;

        SessionLockGuard {
            map: self,
            session_id: session_id.clone(),
            _guard: guard,
        }
    }

    fn release(&self, session_id: &SessionId) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(session_id) {
            entry.refcount -= 1;
            if entry.refcount == 0 {
                entries.remove(session_id);
            }
        }
    }
}

impl Drop for SessionLockGuard<'_> {
    fn drop(&mut self) {
        self.map.release(&self.session_id);
    }
}

#[cfg(test)]
#[path = "session_lock_tests.rs"]
mod tests;

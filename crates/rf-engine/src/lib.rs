// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Session worker lifecycle manager and run stream bus: the control-plane
//! engine binding container, executor, and repository ports into the
//! session worker state machine, plus the in-memory event bus that fans
//! provider stream chunks out to run subscribers.

mod lifecycle;
mod retry;
mod session_lock;
mod stream_bus;

pub use lifecycle::{LifecycleError, SessionWorkerLifecycle};
pub use retry::{retry_transient, RetryConfig};
pub use session_lock::{SessionLockGuard, SessionLockMap};
pub use stream_bus::{StreamBus, StreamBusConfig, StreamError, Unsubscribe};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::session::SessionId;
use chrono::DateTime;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

#[test]
fn provisioning_has_no_container_and_holds_invariants() {
    let w = SessionWorker::provisioning(SessionId::new("s1"), now());
    assert_eq!(w.state, WorkerState::Provisioning);
    assert!(w.container_id.is_none());
    assert!(w.invariants_hold());
}

#[test]
fn running_without_container_violates_invariant() {
    let mut w = SessionWorker::provisioning(SessionId::new("s1"), now());
    w.state = WorkerState::Running;
    assert!(!w.invariants_hold());
}

#[test]
fn running_with_container_holds_invariant() {
    let mut w = SessionWorker::provisioning(SessionId::new("s1"), now());
    w.state = WorkerState::Running;
    w.container_id = Some(ContainerId::new("ctr-1"));
    assert!(w.invariants_hold());
}

#[test]
fn stopped_without_stopped_at_violates_invariant() {
    let mut w = SessionWorker::provisioning(SessionId::new("s1"), now());
    w.state = WorkerState::Stopped;
    assert!(!w.invariants_hold());
}

#[test]
fn deleted_without_stopped_at_violates_invariant() {
    let mut w = SessionWorker::provisioning(SessionId::new("s1"), now());
    w.state = WorkerState::Deleted;
    assert!(!w.invariants_hold());
}

#[test]
fn stopped_with_stopped_at_holds_invariant() {
    let mut w = SessionWorker::provisioning(SessionId::new("s1"), now());
    w.state = WorkerState::Stopped;
    w.stopped_at = Some(now());
    assert!(w.invariants_hold());
}

#[test]
fn deleted_is_terminal() {
    assert!(WorkerState::Deleted.is_terminal());
    assert!(!WorkerState::Running.is_terminal());
}

#[test]
fn sync_status_defaults_to_never() {
    assert_eq!(SyncStatus::default(), SyncStatus::Never);
}

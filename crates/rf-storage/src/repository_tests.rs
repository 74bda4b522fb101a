// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rf_core::test_support;
use rf_core::{SessionWorker, SyncStatus, WorkerState};

fn worker(id: &str, state: WorkerState, last_active_at: DateTime<Utc>) -> SessionWorker {
    let mut w = SessionWorker::provisioning(test_support::session(id), last_active_at);
    w.state = state;
    w
}

#[test]
fn idle_running_filters_by_state_and_cutoff_and_orders_ascending() {
    let now = test_support::fixed_now();
    let old = now - chrono::Duration::hours(2);
    let older = now - chrono::Duration::hours(3);
    let running_old = worker("a", WorkerState::Running, old);
    let running_older = worker("b", WorkerState::Running, older);
    let running_recent = worker("c", WorkerState::Running, now);
    let stopped = worker("d", WorkerState::Stopped, older);

    let workers = vec![running_old, running_older, running_recent, stopped];
    let matched = filter_idle_running(workers.into_iter(), now - chrono::Duration::hours(1), 10);

    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].session_id, test_support::session("b"));
    assert_eq!(matched[1].session_id, test_support::session("a"));
}

#[test]
fn idle_running_negative_limit_returns_empty() {
    let now = test_support::fixed_now();
    let workers = vec![worker("a", WorkerState::Running, now - chrono::Duration::hours(2))];
    let matched = filter_idle_running(workers.into_iter(), now, -5);
    assert!(matched.is_empty());
}

#[test]
fn long_stopped_requires_stopped_at_set() {
    let now = test_support::fixed_now();
    let mut stopped = worker("a", WorkerState::Stopped, now);
    stopped.stopped_at = Some(now - chrono::Duration::hours(5));
    let mut stopped_no_timestamp = worker("b", WorkerState::Stopped, now);
    stopped_no_timestamp.stopped_at = None;

    let workers = vec![stopped, stopped_no_timestamp];
    let matched = filter_long_stopped(workers.into_iter(), now - chrono::Duration::hours(1), 10);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].session_id, test_support::session("a"));
}

#[test]
fn stale_sync_excludes_running_sync_status() {
    let now = test_support::fixed_now();
    let mut stale = worker("a", WorkerState::Running, now);
    stale.last_sync_status = SyncStatus::Succeeded;
    stale.last_sync_at = Some(now - chrono::Duration::hours(2));

    let mut in_flight = worker("b", WorkerState::Running, now);
    in_flight.last_sync_status = SyncStatus::Running;
    in_flight.last_sync_at = Some(now - chrono::Duration::hours(2));

    let mut deleted = worker("c", WorkerState::Deleted, now);
    deleted.last_sync_status = SyncStatus::Failed;
    deleted.last_sync_at = Some(now - chrono::Duration::hours(2));

    let workers = vec![stale, in_flight, deleted];
    let matched =
        filter_stale_sync_candidates(workers.into_iter(), now - chrono::Duration::hours(1), 10);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].session_id, test_support::session("a"));
}

#[test]
fn stale_sync_treats_null_last_sync_at_as_oldest() {
    let now = test_support::fixed_now();
    let mut never_synced = worker("a", WorkerState::Running, now);
    never_synced.last_sync_at = None;

    let mut synced_recently_stale = worker("b", WorkerState::Running, now);
    synced_recently_stale.last_sync_at = Some(now - chrono::Duration::hours(2));

    let workers = vec![synced_recently_stale, never_synced];
    let matched =
        filter_stale_sync_candidates(workers.into_iter(), now - chrono::Duration::hours(1), 10);

    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].session_id, test_support::session("a"));
    assert_eq!(matched[1].session_id, test_support::session("b"));
}

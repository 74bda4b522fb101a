// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rf_core::test_support;

#[tokio::test]
async fn yields_scripted_chunks_then_none() {
    let mut handle = FakeProviderRunHandle::new(vec![
        test_support::message_delta("hi"),
        test_support::run_finished(RunStatus::Succeeded),
    ]);

    assert_eq!(handle.next_chunk().await, Some(test_support::message_delta("hi")));
    assert_eq!(
        handle.next_chunk().await,
        Some(test_support::run_finished(RunStatus::Succeeded))
    );
    assert_eq!(handle.next_chunk().await, None);
}

#[tokio::test]
async fn stop_truncates_and_appends_canceled() {
    let mut handle = FakeProviderRunHandle::new(vec![
        test_support::message_delta("hi"),
        test_support::message_delta("there"),
    ]);

    handle.stop().await;
    match handle.next_chunk().await {
        Some(ProviderStreamChunk::RunFinished { status, .. }) => {
            assert_eq!(status, RunStatus::Canceled);
        }
        other => panic!("expected canceled run.finished, got {other:?}"),
    }
    assert_eq!(handle.next_chunk().await, None);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let mut handle = FakeProviderRunHandle::new(vec![test_support::message_delta("hi")]);
    handle.stop().await;
    handle.stop().await;
    // Only one canceled chunk should ever be queued.
    let mut finished_count = 0;
    while let Some(chunk) = handle.next_chunk().await {
        if matches!(chunk, ProviderStreamChunk::RunFinished { .. }) {
            finished_count += 1;
        }
    }
    assert_eq!(finished_count, 1);
}

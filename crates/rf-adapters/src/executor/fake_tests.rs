// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rf_core::test_support;

#[tokio::test]
async fn restore_and_link_succeed_by_default() {
    let client = FakeExecutorClient::new();
    let container_id = test_support::container("c1");
    let plan = test_support::plan("p1");

    client.restore_workspace(&container_id, &plan).await.unwrap();
    client.link_agent_data(&container_id).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![
            ExecutorCall::RestoreWorkspace(container_id.clone(), plan.fingerprint),
            ExecutorCall::LinkAgentData(container_id),
        ]
    );
}

#[tokio::test]
async fn scripted_restore_failure_fires_once() {
    let client = FakeExecutorClient::new();
    let container_id = test_support::container("c1");
    let plan = test_support::plan("p1");

    client.fail_restore_for(container_id.clone());
    let err = client.restore_workspace(&container_id, &plan).await.unwrap_err();
    assert!(matches!(err, ExecutorError::RestoreFailed(_)));

    client.restore_workspace(&container_id, &plan).await.unwrap();
}

#[tokio::test]
async fn scripted_link_failure_fires_once() {
    let client = FakeExecutorClient::new();
    let container_id = test_support::container("c1");

    client.fail_link_for(container_id.clone());
    let err = client.link_agent_data(&container_id).await.unwrap_err();
    assert!(matches!(err, ExecutorError::LinkFailed(_)));

    client.link_agent_data(&container_id).await.unwrap();
}

#[tokio::test]
async fn validate_reports_missing_required_paths() {
    let client = FakeExecutorClient::new();
    let container_id = test_support::container("c1");
    let plan = test_support::plan("p1").with_required_paths(vec!["/workspace/src".into()]);

    client.set_missing_paths(vec!["/workspace/src".into()]);
    let result = client.validate_workspace(&container_id, &plan).await.unwrap();
    assert!(!result.ok);
    assert_eq!(result.missing_required_paths, vec!["/workspace/src".to_string()]);
}

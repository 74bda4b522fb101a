// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property-based tests for the state machine invariants in spec §8:
//! arbitrary interleavings of `ensureRunning`/`stop`/`delete` never violate
//! `SessionWorker::invariants_hold`, `deleted` is terminal, and a successful
//! `ensureRunning` always returns a worker the driver agrees is running.

use super::*;
use proptest::prelude::*;
use rf_adapters::{FakeContainerDriver, FakeExecutorClient};
use rf_core::{test_support, FakeClock};
use rf_storage::{InMemorySessionWorkerRepository, SessionWorkerRepository};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Action {
    EnsureRunning,
    Stop,
    Delete,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::EnsureRunning),
        Just(Action::Stop),
        Just(Action::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_action_sequences_never_break_invariants(actions in prop::collection::vec(action_strategy(), 0..12)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let containers = FakeContainerDriver::new();
            let executor = FakeExecutorClient::new();
            let repository = Arc::new(InMemorySessionWorkerRepository::new());
            let clock = FakeClock::new(test_support::fixed_now());
            let lifecycle: SessionWorkerLifecycle<_, _, _, _> = SessionWorkerLifecycle::new(
                containers.clone(),
                executor,
                Arc::clone(&repository),
                clock,
            );
            let session_id = test_support::session("s1");
            let plan = test_support::plan("a");

            let mut ever_deleted = false;

            for action in actions {
                match action {
                    Action::EnsureRunning => {
                        match lifecycle.ensure_running(session_id.clone(), plan.clone()).await {
                            Ok(worker) => {
                                assert!(worker.invariants_hold());
                                if worker.state == WorkerState::Running {
                                    assert!(worker.container_id.is_some());
                                    let id = worker.container_id.clone().unwrap();
                                    assert!(containers.exists(&id).await.unwrap_or(false));
                                }
                                assert!(!ever_deleted, "deleted must reject further ensureRunning");
                            }
                            Err(LifecycleError::WorkerDeleted(_)) => {
                                assert!(ever_deleted, "WorkerDeleted only after delete");
                            }
                            Err(_) => {}
                        }
                    }
                    Action::Stop => {
                        if let Ok(worker) = lifecycle.stop(&session_id).await {
                            assert!(worker.invariants_hold());
                            assert!(!ever_deleted, "deleted must reject further stop");
                        }
                    }
                    Action::Delete => {
                        if lifecycle.delete(&session_id).await.is_ok() {
                            ever_deleted = true;
                            if let Ok(Some(worker)) = repository.find_by_session_id(&session_id).await {
                                assert!(worker.invariants_hold());
                                assert_eq!(worker.state, WorkerState::Deleted);
                                assert!(worker.stopped_at.is_some(), "deleted worker must have stopped_at set");
                            }
                        }
                    }
                }
            }
        });
    }
}

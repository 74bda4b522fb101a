// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn run_finished_is_terminal() {
    let chunk = ProviderStreamChunk::RunFinished {
        status: RunStatus::Succeeded,
        reason: None,
        usage: None,
    };
    assert!(chunk.is_finished());
    let chunk = ProviderStreamChunk::MessageDelta {
        text: "hi".into(),
    };
    assert!(!chunk.is_finished());
}

#[test]
fn message_delta_round_trips_json() {
    let chunk = ProviderStreamChunk::MessageDelta {
        text: "hello".to_string(),
    };
    let json = serde_json::to_value(&chunk).expect("serialize");
    assert_eq!(json["type"], "message.delta");
    assert_eq!(json["text"], "hello");
    let back: ProviderStreamChunk = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, chunk);
}

#[test]
fn todo_update_round_trips_json() {
    let chunk = ProviderStreamChunk::TodoUpdate {
        todo_id: "t1".to_string(),
        content: "write tests".to_string(),
        status: TodoStatus::Doing,
        order: 2,
    };
    let json = serde_json::to_value(&chunk).expect("serialize");
    assert_eq!(json["type"], "todo.update");
    assert_eq!(json["status"], "doing");
    let back: ProviderStreamChunk = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, chunk);
}

#[test]
fn envelope_carries_seq() {
    let envelope = StreamEnvelope {
        seq: 3,
        event: ProviderStreamChunk::MessageDelta {
            text: "x".to_string(),
        },
    };
    assert_eq!(envelope.seq, 3);
}

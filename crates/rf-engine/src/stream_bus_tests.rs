// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex as StdMutex;
use rf_core::test_support;
use std::sync::Arc;

fn recorder<T: Send + 'static>() -> (Arc<StdMutex<Vec<T>>>, impl Fn(T) + Send + 'static) {
    let log = Arc::new(StdMutex::new(Vec::new()));
    let log2 = Arc::clone(&log);
    (log, move |item: T| log2.lock().push(item))
}

#[test]
fn publish_assigns_increasing_seq_starting_at_one() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    let e1 = bus.publish("s1".to_string(), test_support::message_delta("a")).unwrap();
    let e2 = bus.publish("s1".to_string(), test_support::message_delta("b")).unwrap();
    assert_eq!(e1.seq, 1);
    assert_eq!(e2.seq, 2);
}

#[test]
fn subscriber_receives_live_events_synchronously() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    let (log, on_event) = recorder();
    let _sub = bus
        .subscribe("s1".to_string(), 0, on_event, || {})
        .expect("not closed");

    bus.publish("s1".to_string(), test_support::message_delta("a")).unwrap();
    bus.publish("s1".to_string(), test_support::message_delta("b")).unwrap();

    let received = log.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].seq, 1);
    assert_eq!(received[1].seq, 2);
}

#[test]
fn subscribe_replays_buffered_suffix_after_seq() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    bus.publish("s1".to_string(), test_support::message_delta("a")).unwrap();
    bus.publish("s1".to_string(), test_support::message_delta("b")).unwrap();
    bus.publish("s1".to_string(), test_support::message_delta("c")).unwrap();

    let (log, on_event) = recorder();
    let _sub = bus.subscribe("s1".to_string(), 1, on_event, || {}).unwrap();

    let received = log.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].seq, 2);
    assert_eq!(received[1].seq, 3);
}

#[test]
fn publish_on_closed_stream_fails_with_no_side_effect() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    bus.publish("s1".to_string(), test_support::message_delta("a")).unwrap();
    bus.close("s1".to_string());

    let err = bus.publish("s1".to_string(), test_support::message_delta("b")).unwrap_err();
    assert!(matches!(err, StreamError::StreamClosed));
    assert!(bus.is_closed(&"s1".to_string()));
}

#[test]
fn close_is_idempotent_and_notifies_subscribers() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    let closed = Arc::new(StdMutex::new(0u32));
    let closed2 = Arc::clone(&closed);
    let _sub = bus
        .subscribe("s1".to_string(), 0, |_: StreamEnvelope<_>| {}, move || {
            *closed2.lock() += 1;
        })
        .unwrap();

    bus.close("s1".to_string());
    bus.close("s1".to_string());

    assert_eq!(*closed.lock(), 1);
}

#[test]
fn subscribe_on_already_closed_stream_fires_on_close_and_does_not_register() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    bus.close("s1".to_string());

    let closed = Arc::new(StdMutex::new(false));
    let closed2 = Arc::clone(&closed);
    let sub = bus.subscribe(
        "s1".to_string(),
        0,
        |_: StreamEnvelope<_>| {},
        move || *closed2.lock() = true,
    );

    assert!(sub.is_none());
    assert!(*closed.lock());
}

#[test]
fn unsubscribe_stops_future_delivery() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    let (log, on_event) = recorder();
    let sub = bus.subscribe("s1".to_string(), 0, on_event, || {}).unwrap();

    bus.publish("s1".to_string(), test_support::message_delta("a")).unwrap();
    sub.unsubscribe();
    bus.publish("s1".to_string(), test_support::message_delta("b")).unwrap();

    assert_eq!(log.lock().len(), 1);
}

#[test]
fn buffer_evicts_oldest_beyond_capacity() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig {
        max_events_per_stream: 2,
    });
    bus.publish("s1".to_string(), test_support::message_delta("a")).unwrap();
    bus.publish("s1".to_string(), test_support::message_delta("b")).unwrap();
    bus.publish("s1".to_string(), test_support::message_delta("c")).unwrap();

    let (log, on_event) = recorder();
    let _sub = bus.subscribe("s1".to_string(), 0, on_event, || {}).unwrap();

    let received = log.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].seq, 2);
    assert_eq!(received[1].seq, 3);
}

#[test]
fn untouched_stream_is_auto_materialized_and_not_closed() {
    let bus: StreamBus<String, _> = StreamBus::new(StreamBusConfig::default());
    assert!(!bus.is_closed(&"never-seen".to_string()));
}

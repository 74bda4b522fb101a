// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run stream bus: an in-memory, sequence-numbered, replay-capable,
//! multi-subscriber event bus for provider stream chunks.
//!
//! Modeled on the HashMap-keyed manager shape the session worker lifecycle
//! manager's timer scheduler uses, generalized to carry a bounded replay
//! buffer and synchronous subscriber fan-out instead of fired-timer
//! collection.

use parking_lot::Mutex;
use rf_core::StreamEnvelope;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors from stream bus operations.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream is closed")]
    StreamClosed,
}

/// Bounds on the stream bus's in-memory replay buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamBusConfig {
    /// Events retained per stream for replay before the oldest is evicted.
    pub max_events_per_stream: usize,
}

impl Default for StreamBusConfig {
    fn default() -> Self {
        Self {
            max_events_per_stream: 1000,
        }
    }
}

type EventCallback<T> = Box<dyn Fn(StreamEnvelope<T>) + Send>;
type CloseCallback = Box<dyn Fn() + Send>;

struct Subscriber<T> {
    id: u64,
    on_event: EventCallback<T>,
    on_close: CloseCallback,
}

struct StreamState<T> {
    next_seq: u64,
    closed: bool,
    buffer: VecDeque<StreamEnvelope<T>>,
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Default for StreamState<T> {
    fn default() -> Self {
        Self {
            next_seq: 1,
            closed: false,
            buffer: VecDeque::new(),
            subscribers: Vec::new(),
        }
    }
}

struct Inner<Id, T> {
    config: StreamBusConfig,
    streams: Mutex<HashMap<Id, StreamState<T>>>,
    next_subscriber_id: AtomicU64,
}

/// A handle returned from [`StreamBus::subscribe`]. Dropping it does
/// nothing; call [`Unsubscribe::unsubscribe`] explicitly to deregister.
pub struct Unsubscribe<Id, T> {
    inner: Arc<Inner<Id, T>>,
    stream_id: Id,
    subscriber_id: u64,
}

impl<Id: Eq + Hash, T> Unsubscribe<Id, T> {
    /// Removes the subscriber. A no-op if already unsubscribed or the
    /// stream has since closed (which clears its subscriber set anyway).
    pub fn unsubscribe(self) {
        let mut streams = self.inner.streams.lock();
        if let Some(state) = streams.get_mut(&self.stream_id) {
            state.subscribers.retain(|s| s.id != self.subscriber_id);
        }
    }
}

/// An in-memory, sequence-numbered, replay-capable, multi-subscriber event
/// bus. Generic over the stream identifier and the event payload type.
///
/// `publish`, `subscribe`, and `close` are non-suspending: the entire
/// critical section (seq assignment, buffer append, subscriber fan-out)
/// runs under a single `parking_lot::Mutex` and never awaits. Callbacks
/// must themselves be non-blocking; a subscriber that needs to do I/O is
/// responsible for trampolining into its own queue.
pub struct StreamBus<Id, T> {
    inner: Arc<Inner<Id, T>>,
}

impl<Id, T> Clone for StreamBus<Id, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Id: Eq + Hash + Clone, T: Clone> StreamBus<Id, T> {
    pub fn new(config: StreamBusConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                streams: Mutex::new(HashMap::new()),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    /// Assigns the next seq, appends to the bounded buffer (evicting the
    /// oldest entry if over `maxEventsPerStream`), then delivers
    /// synchronously to every current subscriber in registration order.
    pub fn publish(&self, stream_id: Id, event: T) -> Result<StreamEnvelope<T>, StreamError> {
        let mut streams = self.inner.streams.lock();
        let state = streams.entry(stream_id).or_default();
        if state.closed {
            return Err(StreamError::StreamClosed);
        }

        let envelope = StreamEnvelope {
            seq: state.next_seq,
            event,
        };
        state.next_seq += 1;
        state.buffer.push_back(envelope.clone());
        while state.buffer.len() > self.inner.config.max_events_per_stream {
            state.buffer.pop_front();
        }
        for subscriber in &state.subscribers {
            (subscriber.on_event)(envelope.clone());
        }
        Ok(envelope)
    }

    /// Idempotent. Marks the stream closed, notifies subscribers via
    /// `on_close`, and clears the subscriber set.
    pub fn close(&self, stream_id: Id) {
        let mut streams = self.inner.streams.lock();
        let state = streams.entry(stream_id).or_default();
        if state.closed {
            return;
        }
        state.closed = true;
        let subscribers = std::mem::take(&mut state.subscribers);
        for subscriber in &subscribers {
            (subscriber.on_close)();
        }
    }

    pub fn is_closed(&self, stream_id: &Id) -> bool {
        self.inner
            .streams
            .lock()
            .get(stream_id)
            .is_some_and(|s| s.closed)
    }

    /// Replays the buffered suffix strictly greater than `after_seq` via
    /// `on_event`, then either registers the subscriber for future
    /// publishes or — if the stream is already closed — fires `on_close`
    /// immediately and returns `None`.
    pub fn subscribe(
        &self,
        stream_id: Id,
        after_seq: u64,
        on_event: impl Fn(StreamEnvelope<T>) + Send + 'static,
        on_close: impl Fn() + Send + 'static,
    ) -> Option<Unsubscribe<Id, T>> {
        let mut streams = self.inner.streams.lock();
        let state = streams.entry(stream_id.clone()).or_default();

        for envelope in state.buffer.iter().filter(|e| e.seq > after_seq) {
            on_event(envelope.clone());
        }

        if state.closed {
            on_close();
            return None;
        }

        let subscriber_id = self.inner.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        state.subscribers.push(Subscriber {
            id: subscriber_id,
            on_event: Box::new(on_event),
            on_close: Box::new(on_close),
        });

        Some(Unsubscribe {
            inner: Arc::clone(&self.inner),
            stream_id,
            subscriber_id,
        })
    }
}

#[cfg(test)]
#[path = "stream_bus_tests.rs"]
mod tests;

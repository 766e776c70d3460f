//
// SPDX-License-Identifier: Apache-2.0
//

//! Single-subscriber fan-out of lifecycle and error events.
//!
//! Delivery is synchronous with the event's cause and serialized on a
//! dedicated mutex distinct from the context mutex, so a subscriber that
//! merely reads state does not contend with in-flight dispatch work.
//! Subscribers must not call back into `init`/`terminate`: doing so
//! re-enters the context mutex from the same call stack and self-deadlocks.

use std::sync::Arc;

use log::trace;

use crate::core::sync::LabeledMutex;

/// Lifecycle and error events raised by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventId {
    Initialized,
    SignalingConnecting,
    SignalingConnected,
    SignalingDisconnected,
    SignalingError,
    ReceivedOffer,
    SentAnswer,
    SentOffer,
    PeerConnectionRequested,
    PeerConnected,
    PeerDisconnected,
    Error,
}

/// A single event occurrence handed to the subscriber.
#[derive(Clone, Debug)]
pub struct Event {
    pub event_id: EventId,
    pub status_code: i32,
    pub peer_id: Option<String>,
    pub message: String,
}

impl Event {
    pub fn new(event_id: EventId, status_code: i32, peer_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            event_id,
            status_code,
            peer_id: peer_id.map(str::to_string),
            message: message.into(),
        }
    }
}

pub type EventCallback = Arc<dyn Fn(Event) + Send + Sync>;

/// At-most-one-subscriber event bus.
pub struct EventBus {
    subscriber: LabeledMutex<Option<EventCallback>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriber: LabeledMutex::new(None, "event_bus.subscriber"),
        }
    }

    /// Atomically installs a subscriber, or clears it when `callback` is
    /// `None`.
    pub fn register(&self, callback: Option<EventCallback>) -> crate::common::Result<()> {
        *self.subscriber.lock()? = callback;
        Ok(())
    }

    /// Raises an event, delivering it synchronously on the calling thread
    /// if a subscriber is installed.
    pub fn raise(&self, event: Event) {
        trace!("event bus: raising {:?} (peer={:?})", event.event_id, event.peer_id);
        let guard = match self.subscriber.lock() {
            Ok(g) => g,
            Err(_) => return,
        };
        if let Some(cb) = guard.as_ref() {
            cb(event);
        }
    }
}

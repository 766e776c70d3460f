//
// SPDX-License-Identifier: Apache-2.0
//

//! Per-peer FIFOs of signaling messages that arrived before their session
//! existed, and the table of such queues keyed by `fingerprint(peer_id)`.

use std::collections::{HashMap, VecDeque};

use log::{debug, info};

use crate::common::Result;
use crate::config::constants::PENDING_CLEANUP_TTL;
use crate::core::signaling::Message;
use crate::error::CoreError;

/// A per-peer FIFO holding inbound messages (ICE candidates) that arrived
/// before their session was created.
pub struct PendingQueue {
    pub fingerprint: u32,
    pub create_time_nanos: u64,
    messages: VecDeque<Message>,
}

impl PendingQueue {
    fn new(fingerprint: u32, now_nanos: u64) -> Self {
        Self {
            fingerprint,
            create_time_nanos: now_nanos,
            messages: VecDeque::new(),
        }
    }

    /// Reserves capacity for one more message before enqueuing it, so a
    /// failed allocation is reported as `NotEnoughMemory` rather than
    /// aborting the process.
    pub fn push(&mut self, message: Message) -> Result<()> {
        self.messages.try_reserve(1).map_err(|_| CoreError::NotEnoughMemory)?;
        self.messages.push_back(message);
        Ok(())
    }

    pub fn is_expired(&self, now_nanos: u64) -> bool {
        now_nanos.saturating_sub(self.create_time_nanos) > PENDING_CLEANUP_TTL.as_nanos() as u64
    }

    /// Drains every queued message in FIFO arrival order.
    pub fn drain(&mut self) -> Vec<Message> {
        self.messages.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The table of pending queues, keyed by `fingerprint(peer_id)`.
#[derive(Default)]
pub struct PendingQueueTable {
    queues: HashMap<u32, PendingQueue>,
}

impl PendingQueueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the queue for `fingerprint`, creating it (deep-copying
    /// nothing yet, just allocating the FIFO) if this is the first orphan
    /// message for the peer.
    pub fn fetch_or_create(&mut self, fingerprint: u32, now_nanos: u64) -> &mut PendingQueue {
        self.queues.entry(fingerprint).or_insert_with(|| {
            debug!("pending queue: created for fingerprint={fingerprint:#x}");
            PendingQueue::new(fingerprint, now_nanos)
        })
    }

    /// Removes and returns the queue for `fingerprint`, if any, draining
    /// it into FIFO order for replay against a freshly created session.
    pub fn take_drained(&mut self, fingerprint: u32) -> Vec<Message> {
        match self.queues.remove(&fingerprint) {
            Some(mut q) => q.drain(),
            None => Vec::new(),
        }
    }

    /// Drops the queue for `fingerprint` without replaying it (used when
    /// an offer is rejected for capacity reasons).
    pub fn discard(&mut self, fingerprint: u32) {
        if self.queues.remove(&fingerprint).is_some() {
            debug!("pending queue: discarded for fingerprint={fingerprint:#x}");
        }
    }

    /// Evicts every queue older than `PENDING_CLEANUP_TTL`, preserving
    /// the order of the rest. Returns the number evicted.
    pub fn evict_expired(&mut self, now_nanos: u64) -> usize {
        let before = self.queues.len();
        self.queues.retain(|_, q| !q.is_expired(now_nanos));
        let evicted = before - self.queues.len();
        if evicted > 0 {
            info!("pending queue: evicted {evicted} expired queue(s)");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    #[cfg(test)]
    pub fn contains(&self, fingerprint: u32) -> bool {
        self.queues.contains_key(&fingerprint)
    }
}

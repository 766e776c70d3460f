//
// SPDX-License-Identifier: Apache-2.0
//

//! An injectable monotonic clock.
//!
//! The monitor task and the reconnect/pending-queue controllers only ever
//! ask "how long has elapsed" relative to a captured instant, so they are
//! written against this trait instead of `std::time::Instant` directly.
//! Tests supply a `TestClock` that advances under explicit control,
//! letting scenarios like the 30s pending-queue TTL or the multi-minute
//! reconnect back-off run instantly instead of sleeping in real time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of monotonic time, in nanoseconds since an arbitrary epoch.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_nanos(&self) -> u64;
}

/// The real wall clock, backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// A manually-advanced clock for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct TestClock {
    nanos: Arc<AtomicU64>,
}

impl TestClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }
}

pub fn nanos_to_duration(nanos: u64) -> Duration {
    Duration::from_nanos(nanos)
}

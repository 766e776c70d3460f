//
// SPDX-License-Identifier: Apache-2.0
//

//! A labeled `Mutex` wrapper.
//!
//! `lock()` converts mutex poisoning into `CoreError::MutexPoisoned`
//! instead of panicking, so a panic in one peer's engine callback while
//! holding the context mutex cannot wedge every other caller into an
//! `unwrap()`-triggered panic of their own.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::common::Result;
use crate::error::CoreError;

pub struct LabeledMutex<T: ?Sized> {
    /// Human readable label, used only in the poisoned-mutex error.
    label: &'static str,
    mutex: Mutex<T>,
}

impl<T> LabeledMutex<T> {
    pub fn new(value: T, label: &'static str) -> LabeledMutex<T> {
        LabeledMutex {
            mutex: Mutex::new(value),
            label,
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, T>> {
        self.mutex.lock().map_err(|_| CoreError::MutexPoisoned(self.label.to_string()))
    }
}

/// The condition variable the monitor task waits on, bounded to
/// `SESSION_CLEANUP_PERIOD` so cancellation and reconnect requests are
/// never starved by an unbounded wait.
#[derive(Default)]
pub struct Notifier {
    mutex: Mutex<()>,
    cvar: Condvar,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits up to `timeout` or until `notify_all` is called.
    pub fn wait_timeout(&self, timeout: Duration) {
        if let Ok(guard) = self.mutex.lock() {
            let _ = self.cvar.wait_timeout(guard, timeout);
        }
    }

    pub fn notify_all(&self) {
        self.cvar.notify_all();
    }
}

//
// SPDX-License-Identifier: Apache-2.0
//

//! Exponential-backoff reconnect of the signaling client with an
//! in-flight connection timeout.
//!
//! The source tracks this state in function-local `statics`, which would
//! race under multiple concurrent monitors. Since a `WebRtcContext` runs
//! exactly one monitor task, this controller's state simply lives as a
//! field of the context instead, owned and mutated only while the
//! context mutex is held.

use log::{info, warn};

use crate::config::constants::{CONNECTION_ATTEMPT_TIMEOUT, RECONNECT_BACKOFF_SECS};
use crate::core::platform::SignalingTransport;

/// Per-cycle outcome, so the caller can decide whether to keep
/// `recreate_signaling` set without the controller reaching back into the
/// context itself.
#[derive(Debug, PartialEq, Eq)]
pub enum ReconnectOutcome {
    /// Nothing to do this cycle (waiting out the back-off or an in-flight
    /// attempt that hasn't timed out yet).
    Waiting,
    /// An attempt was just started.
    AttemptStarted,
    /// An in-flight attempt timed out, or a just-started attempt's
    /// `connect()` failed immediately; `retry_count` was bumped.
    AttemptFailed,
}

#[derive(Debug)]
pub struct ReconnectController {
    retry_count: u32,
    last_retry_time_nanos: u64,
    connection_start_time_nanos: u64,
    connection_in_progress: bool,
}

impl Default for ReconnectController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconnectController {
    pub fn new() -> Self {
        Self {
            retry_count: 0,
            last_retry_time_nanos: 0,
            connection_start_time_nanos: 0,
            connection_in_progress: false,
        }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// The wait required, after `retry_count` consecutive failures,
    /// before the next attempt: `RECONNECT_BACKOFF_SECS[retry_count - 1]`,
    /// saturating at the table's last entry.
    fn backoff_nanos(&self) -> u64 {
        let idx = (self.retry_count.saturating_sub(1) as usize).min(RECONNECT_BACKOFF_SECS.len() - 1);
        RECONNECT_BACKOFF_SECS[idx] * 1_000_000_000
    }

    /// Called when the transport reports `Connected`; the controller
    /// never clears itself, only this callback does.
    pub fn on_connected(&mut self) {
        info!("reconnect controller: signaling connected, resetting backoff state");
        self.retry_count = 0;
        self.last_retry_time_nanos = 0;
        self.connection_start_time_nanos = 0;
        self.connection_in_progress = false;
    }

    /// One monitor-cycle step, run only while `recreate_signaling` is set.
    /// Never propagates a `connect()` error out; it is absorbed into
    /// `ReconnectOutcome::AttemptFailed` and logged.
    pub fn step(&mut self, transport: &dyn SignalingTransport, now_nanos: u64) -> ReconnectOutcome {
        if self.connection_in_progress {
            let elapsed = now_nanos.saturating_sub(self.connection_start_time_nanos);
            if elapsed >= CONNECTION_ATTEMPT_TIMEOUT.as_nanos() as u64 {
                warn!("reconnect controller: attempt timed out after {:?}", CONNECTION_ATTEMPT_TIMEOUT);
                self.connection_in_progress = false;
                self.retry_count = self.retry_count.saturating_add(1);
                self.last_retry_time_nanos = now_nanos;
                return ReconnectOutcome::AttemptFailed;
            }
            return ReconnectOutcome::Waiting;
        }

        // `retry_count == 0`, not `last_retry_time_nanos == 0`, marks "never
        // attempted": a failure recorded at clock time zero would otherwise
        // be indistinguishable from having never tried.
        let should_attempt = self.retry_count == 0 || now_nanos.saturating_sub(self.last_retry_time_nanos) >= self.backoff_nanos();
        if !should_attempt {
            return ReconnectOutcome::Waiting;
        }

        info!("reconnect controller: attempting reconnect (retry_count={})", self.retry_count);
        let _ = transport.disconnect();
        self.connection_in_progress = true;
        self.connection_start_time_nanos = now_nanos;
        match transport.connect() {
            Ok(()) => ReconnectOutcome::AttemptStarted,
            Err(err) => {
                warn!("reconnect controller: connect() failed immediately: {err}");
                self.connection_in_progress = false;
                self.retry_count = self.retry_count.saturating_add(1);
                self.last_retry_time_nanos = now_nanos;
                ReconnectOutcome::AttemptFailed
            }
        }
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::sim::SimSignalingTransport;

    #[test]
    fn backoff_table_saturates() {
        let mut controller = ReconnectController::new();
        controller.retry_count = 10;
        assert_eq!(controller.backoff_nanos(), 60 * 1_000_000_000);
    }

    #[test]
    fn immediate_connect_failure_bumps_retry_count_once() {
        let transport = SimSignalingTransport::new();
        transport.force_connect_failure(true);
        let mut controller = ReconnectController::new();
        let outcome = controller.step(&*transport, 0);
        assert_eq!(outcome, ReconnectOutcome::AttemptFailed);
        assert_eq!(controller.retry_count(), 1);
    }

    #[test]
    fn timeout_is_counted_as_exactly_one_failure() {
        let transport = SimSignalingTransport::new();
        let mut controller = ReconnectController::new();
        assert_eq!(controller.step(&*transport, 0), ReconnectOutcome::AttemptStarted);
        // Not timed out yet.
        assert_eq!(
            controller.step(&*transport, CONNECTION_ATTEMPT_TIMEOUT.as_nanos() as u64 - 1),
            ReconnectOutcome::Waiting
        );
        assert_eq!(
            controller.step(&*transport, CONNECTION_ATTEMPT_TIMEOUT.as_nanos() as u64),
            ReconnectOutcome::AttemptFailed
        );
        assert_eq!(controller.retry_count(), 1);
    }
}

//
// SPDX-License-Identifier: Apache-2.0
//

//! S5: reconnect back-off timing, driven deterministically through the
//! injected test clock instead of the real monitor thread.

mod common;

use std::time::Duration;

use serial_test::serial;
use webrtc_app_core::config::constants::CONNECTION_ATTEMPT_TIMEOUT;
use webrtc_app_core::{SignalingError, WebRtcConfig};

use common::TestHarness;

/// A connection-lost error should drive attempts at t≈0 (the first,
/// unconditional attempt), then after successive 5s/10s/20s back-offs
/// once every `connect` call fails immediately.
#[test]
#[serial]
fn reconnect_follows_exponential_backoff_after_connection_lost() {
    let harness = TestHarness::new(WebRtcConfig::default());
    harness.signaling.force_connect_failure(true);

    harness.signaling.raise_error(SignalingError::ConnectionLost);

    // t = 0: the unconditional first attempt.
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 1);

    // Short of the 5s back-off: no new attempt yet.
    harness.clock.advance(Duration::from_secs(4));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 1);

    // t = 5: second attempt.
    harness.clock.advance(Duration::from_secs(1));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 2);

    // Short of the 10s back-off from t=5 (i.e. t=14): no new attempt yet.
    harness.clock.advance(Duration::from_secs(9));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 2);

    // t = 15: third attempt.
    harness.clock.advance(Duration::from_secs(1));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 3);

    // t = 34: short of the 20s back-off from t=15.
    harness.clock.advance(Duration::from_secs(19));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 3);

    // t = 35: fourth attempt.
    harness.clock.advance(Duration::from_secs(1));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 4);
}

/// An in-flight attempt that never reports `Connected` must be counted
/// as exactly one failure once it exceeds the connection-attempt
/// timeout, not retried early and not retried twice for the same
/// attempt.
#[test]
#[serial]
fn in_flight_attempt_times_out_after_connection_attempt_timeout() {
    let harness = TestHarness::new(WebRtcConfig::default());
    // connect() itself succeeds, but never reports Connected, so the
    // attempt is left in-flight until the timeout fires.

    harness.signaling.raise_error(SignalingError::ConnectionLost);
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 1);

    harness.clock.advance(CONNECTION_ATTEMPT_TIMEOUT - Duration::from_secs(1));
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 1, "must not retry before the attempt times out");

    harness.clock.advance(Duration::from_secs(1));
    harness.context.run_maintenance_once();
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 1, "timing out does not itself reconnect; it only clears the in-flight flag");

    // A further cycle sees `last_retry_time` freshly set to the timeout
    // moment, so it must wait out the next back-off rather than retry
    // immediately.
    harness.context.run_maintenance_once();
    assert_eq!(harness.signaling.connect_call_count(), 1);
}

//
// SPDX-License-Identifier: Apache-2.0
//

//! Scenarios driven by the viewer-side `trigger_offer` API.

mod common;

use std::sync::{Arc, Mutex};

use serial_test::serial;
use webrtc_app_core::{Event, EventId, WebRtcConfig};

use common::TestHarness;

/// S6: calling `trigger_offer` twice in a row for the same peer, with no
/// intervening answer, must not create a second session or send a
/// second offer.
#[test]
#[serial]
fn duplicate_trigger_offer_is_idempotent() {
    let harness = TestHarness::new(WebRtcConfig::default());
    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let events_for_cb = events.clone();
    harness
        .context
        .register_event_callback(Some(Arc::new(move |e: Event| events_for_cb.lock().unwrap().push(e))))
        .unwrap();

    harness.context.trigger_offer("peer-G").unwrap();
    harness.context.trigger_offer("peer-G").unwrap();

    assert_eq!(harness.engine.create_session_call_count(), 1);
    let sent_offer_count = events.lock().unwrap().iter().filter(|e| e.event_id == EventId::SentOffer).count();
    assert_eq!(sent_offer_count, 1);
}

/// A context running in bridge mode never creates engine sessions at
/// all; inbound traffic is forwarded to the engine verbatim.
#[test]
#[serial]
fn bridge_mode_forwards_without_creating_sessions() {
    let harness = TestHarness::new_bridge(WebRtcConfig::default());

    let message = webrtc_app_core::Message::new(webrtc_app_core::MessageType::Offer, "peer-H", b"v=0\r\n".to_vec()).unwrap();
    harness.context.dispatch_inbound(message).unwrap();

    assert_eq!(harness.engine.create_session_call_count(), 0);
    assert_eq!(harness.engine.send_message_call_count(), 1);
}

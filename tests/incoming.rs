//
// SPDX-License-Identifier: Apache-2.0
//

//! Scenarios driven by inbound signaling traffic: offers arriving for a
//! peer with no session yet, ICE candidates arriving before or after
//! their offer, and the session table at capacity.

mod common;

use std::sync::{Arc, Mutex};

use serial_test::serial;
use webrtc_app_core::config::constants::MAX_SESSIONS;
use webrtc_app_core::{Event, EventId, Message, MessageType, WebRtcConfig};

use common::TestHarness;

fn ice_candidate(peer: &str) -> Message {
    Message::new(MessageType::IceCandidate, peer, b"candidate:1 1 UDP 123 1.2.3.4 9 typ host".to_vec())
        .expect("well-formed test message")
}

fn offer(peer: &str) -> Message {
    Message::new(MessageType::Offer, peer, b"v=0\r\no=- 0 0 IN IP4 0.0.0.0\r\n".to_vec()).expect("well-formed test message")
}

/// S1: an offer arrives for a brand new peer, followed by three ICE
/// candidates for the same peer. The dispatcher must create exactly one
/// session, forward all four messages to the engine in arrival order,
/// and raise `SentAnswer` once the offer has been handed off.
#[test]
#[serial]
fn master_happy_path_creates_one_session_and_forwards_in_order() {
    let harness = TestHarness::new(WebRtcConfig::default());
    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let events_for_cb = events.clone();
    harness
        .context
        .register_event_callback(Some(Arc::new(move |e: Event| events_for_cb.lock().unwrap().push(e))))
        .unwrap();

    harness.context.dispatch_inbound(offer("peer-A")).unwrap();
    for _ in 0..3 {
        harness.context.dispatch_inbound(ice_candidate("peer-A")).unwrap();
    }

    assert_eq!(harness.engine.create_session_call_count(), 1);
    let forwarded = harness.engine.sent_messages_for("peer-A");
    assert_eq!(forwarded.len(), 4);
    assert_eq!(forwarded[0].message_type, MessageType::Offer);
    for msg in &forwarded[1..] {
        assert_eq!(msg.message_type, MessageType::IceCandidate);
    }

    let handle = harness.engine.last_handle().expect("a session was created");
    let answer = Message::new(MessageType::Answer, "peer-A", b"v=0\r\n".to_vec()).unwrap();
    harness.engine.emit_outbound_message(handle, answer);
    assert_eq!(harness.signaling.sent_messages().len(), 1);
    assert_eq!(harness.signaling.sent_messages()[0].message_type, MessageType::Answer);

    let recorded = events.lock().unwrap();
    assert!(recorded.iter().any(|e| e.event_id == EventId::SentAnswer));
}

/// S2: ICE candidates for a peer arrive before any offer. They must be
/// queued, not dropped, and replayed in arrival order once the offer
/// creates the session.
#[test]
#[serial]
fn orphan_candidates_are_queued_and_replayed_in_order() {
    let harness = TestHarness::new(WebRtcConfig::default());

    harness.context.dispatch_inbound(ice_candidate("peer-B")).unwrap();
    harness.context.dispatch_inbound(ice_candidate("peer-B")).unwrap();
    assert_eq!(harness.engine.create_session_call_count(), 0);

    harness.context.dispatch_inbound(offer("peer-B")).unwrap();

    assert_eq!(harness.engine.create_session_call_count(), 1);
    let forwarded = harness.engine.sent_messages_for("peer-B");
    assert_eq!(forwarded.len(), 3);
    assert_eq!(forwarded[0].message_type, MessageType::Offer);
    assert_eq!(forwarded[1].message_type, MessageType::IceCandidate);
    assert_eq!(forwarded[2].message_type, MessageType::IceCandidate);
}

/// S3: an orphan candidate's pending queue expires after 30s. Once
/// evicted, a later offer for the same peer must not see the stale
/// candidate replayed.
#[test]
#[serial]
fn pending_queue_expires_after_ttl() {
    let harness = TestHarness::new(WebRtcConfig::default());

    harness.context.dispatch_inbound(ice_candidate("peer-C")).unwrap();

    harness.clock.advance(std::time::Duration::from_secs(31));
    harness.context.run_maintenance_once();

    harness.context.dispatch_inbound(offer("peer-C")).unwrap();

    let forwarded = harness.engine.sent_messages_for("peer-C");
    assert_eq!(forwarded.len(), 1, "the expired candidate must not be replayed");
    assert_eq!(forwarded[0].message_type, MessageType::Offer);
}

/// S4: once the session table is at capacity, a new offer is dropped:
/// no engine session is created, and none of its traffic reaches the
/// engine.
#[test]
#[serial]
fn offer_is_dropped_when_session_table_is_full() {
    let harness = TestHarness::new(WebRtcConfig::default());

    for i in 0..MAX_SESSIONS {
        harness.context.trigger_offer(&format!("peer-{i}")).unwrap();
    }
    assert_eq!(harness.engine.create_session_call_count(), MAX_SESSIONS as u64);

    harness.context.dispatch_inbound(offer("peer-overflow")).unwrap();

    assert_eq!(harness.engine.create_session_call_count(), MAX_SESSIONS as u64, "no session should be created past capacity");
    assert!(harness.engine.sent_messages_for("peer-overflow").is_empty());
}

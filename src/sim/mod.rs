//
// SPDX-License-Identifier: Apache-2.0
//

//! In-memory test-double collaborators, used by this crate's own
//! integration tests. Grounded on the teacher crate's
//! `sim::sim_platform::SimPlatform`: atomics record call counts, and
//! force-failure switches let tests exercise the error paths without a
//! real signaling server or peer-connection engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::common::Result;
use crate::core::platform::{
    DataChannelConfig, DataChannelObserver, EngineSessionHandle, EngineSessionObserver, PeerConnectionEngine,
    PeerConnectionState, SignalingObserver, SignalingTransport,
};
use crate::core::signaling::{IceServer, IceServerPage, Message, SignalingError, SignalingState};
use crate::error::CoreError;

#[derive(Default)]
struct SimEngineStats {
    create_session_calls: AtomicU64,
    send_message_calls: AtomicU64,
    destroy_session_calls: AtomicU64,
}

/// An in-memory `PeerConnectionEngine` that records every call and
/// forwards `send_message` calls in order to a recorder the test can
/// inspect, without actually negotiating anything.
#[derive(Default)]
pub struct SimPeerConnectionEngine {
    stats: SimEngineStats,
    next_handle: AtomicU64,
    observers: Mutex<HashMap<u64, Arc<dyn EngineSessionObserver>>>,
    sent_messages: Mutex<Vec<(Option<EngineSessionHandle>, Message)>>,
    force_create_failure: AtomicBool,
    force_send_failure: AtomicBool,
    supports_sessions: AtomicBool,
}

impl SimPeerConnectionEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            supports_sessions: AtomicBool::new(true),
            ..Default::default()
        })
    }

    pub fn new_bridge() -> Arc<Self> {
        Arc::new(Self {
            supports_sessions: AtomicBool::new(false),
            ..Default::default()
        })
    }

    pub fn force_create_session_failure(&self, force: bool) {
        self.force_create_failure.store(force, Ordering::SeqCst);
    }

    pub fn force_send_message_failure(&self, force: bool) {
        self.force_send_failure.store(force, Ordering::SeqCst);
    }

    pub fn create_session_call_count(&self) -> u64 {
        self.stats.create_session_calls.load(Ordering::SeqCst)
    }

    pub fn send_message_call_count(&self) -> u64 {
        self.stats.send_message_calls.load(Ordering::SeqCst)
    }

    pub fn destroy_session_call_count(&self) -> u64 {
        self.stats.destroy_session_calls.load(Ordering::SeqCst)
    }

    /// Messages handed to `send_message`, in call order, for assertions
    /// about per-peer FIFO ordering (pending-queue replay, etc.).
    pub fn sent_messages_for(&self, peer_id: &str) -> Vec<Message> {
        self.sent_messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m)| m.peer_client_id.as_str() == peer_id)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Simulates the engine reporting a state change for `handle`.
    pub fn emit_state_change(&self, handle: EngineSessionHandle, state: PeerConnectionState) {
        if let Some(observer) = self.observers.lock().unwrap().get(&handle.0) {
            observer.on_state_change(state);
        }
    }

    /// Simulates the engine producing an outbound message (an answer,
    /// say) for `handle`, to be forwarded over signaling.
    pub fn emit_outbound_message(&self, handle: EngineSessionHandle, message: Message) {
        if let Some(observer) = self.observers.lock().unwrap().get(&handle.0) {
            observer.on_outbound_message(message);
        }
    }

    /// The handle most recently returned from `create_session`, if any.
    pub fn last_handle(&self) -> Option<EngineSessionHandle> {
        let next = self.next_handle.load(Ordering::SeqCst);
        if next == 0 {
            None
        } else {
            Some(EngineSessionHandle(next - 1))
        }
    }
}

impl PeerConnectionEngine for SimPeerConnectionEngine {
    fn create_session(
        &self,
        _peer_id: &str,
        _is_initiator: bool,
        _data_channel_config: Option<DataChannelConfig>,
    ) -> Result<EngineSessionHandle> {
        self.stats.create_session_calls.fetch_add(1, Ordering::SeqCst);
        if self.force_create_failure.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("simulated create_session failure".into()));
        }
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        Ok(EngineSessionHandle(id))
    }

    fn destroy_session(&self, handle: EngineSessionHandle) -> Result<()> {
        self.stats.destroy_session_calls.fetch_add(1, Ordering::SeqCst);
        self.observers.lock().unwrap().remove(&handle.0);
        Ok(())
    }

    fn set_callbacks(&self, handle: EngineSessionHandle, observer: Arc<dyn EngineSessionObserver>) {
        self.observers.lock().unwrap().insert(handle.0, observer);
    }

    fn send_message(&self, handle: Option<EngineSessionHandle>, message: &Message) -> Result<()> {
        self.stats.send_message_calls.fetch_add(1, Ordering::SeqCst);
        if self.force_send_failure.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("simulated send_message failure".into()));
        }
        self.sent_messages.lock().unwrap().push((handle, message.clone()));
        Ok(())
    }

    fn set_ice_servers(&self, _servers: &[IceServer]) -> Result<()> {
        Ok(())
    }

    fn set_data_channel_callbacks(
        &self,
        _handle: Option<EngineSessionHandle>,
        _observer: Arc<dyn DataChannelObserver>,
    ) -> Result<()> {
        Ok(())
    }

    fn send_data_channel_message(&self, _handle: EngineSessionHandle, _channel: &str, _is_binary: bool, _data: &[u8]) -> Result<()> {
        Ok(())
    }

    fn supports_create_session(&self) -> bool {
        self.supports_sessions.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct SimSignalingStats {
    connect_calls: AtomicU64,
    disconnect_calls: AtomicU64,
    send_message_calls: AtomicU64,
}

/// An in-memory `SignalingTransport`. `connect`/`disconnect` can be made
/// to fail on demand so reconnect-controller tests can run without real
/// time or a real network.
#[derive(Default)]
pub struct SimSignalingTransport {
    stats: SimSignalingStats,
    observer: Mutex<Option<Arc<dyn SignalingObserver>>>,
    ice_servers: Mutex<Vec<IceServer>>,
    sent_messages: Mutex<Vec<Message>>,
    force_connect_failure: AtomicBool,
    progressive_ice_supported: AtomicBool,
}

impl SimSignalingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn force_connect_failure(&self, force: bool) {
        self.force_connect_failure.store(force, Ordering::SeqCst);
    }

    pub fn enable_progressive_ice(&self, enabled: bool) {
        self.progressive_ice_supported.store(enabled, Ordering::SeqCst);
    }

    pub fn set_ice_servers_for_test(&self, servers: Vec<IceServer>) {
        *self.ice_servers.lock().unwrap() = servers;
    }

    pub fn connect_call_count(&self) -> u64 {
        self.stats.connect_calls.load(Ordering::SeqCst)
    }

    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent_messages.lock().unwrap().clone()
    }

    /// Delivers an inbound message to the registered observer, as the
    /// signaling reader task would.
    pub fn deliver(&self, message: Message) {
        if let Some(observer) = self.observer.lock().unwrap().as_ref() {
            observer.on_message_received(message);
        }
    }

    pub fn raise_error(&self, error: SignalingError) {
        if let Some(observer) = self.observer.lock().unwrap().as_ref() {
            observer.on_error(error);
        }
    }

    pub fn raise_state(&self, state: SignalingState) {
        if let Some(observer) = self.observer.lock().unwrap().as_ref() {
            observer.on_state_changed(state);
        }
    }
}

impl SignalingTransport for SimSignalingTransport {
    fn connect(&self) -> Result<()> {
        self.stats.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.force_connect_failure.load(Ordering::SeqCst) {
            return Err(CoreError::ConnectionLost);
        }
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        self.stats.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn send_message(&self, message: &Message) -> Result<()> {
        self.stats.send_message_calls.fetch_add(1, Ordering::SeqCst);
        self.sent_messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn set_callbacks(&self, observer: Arc<dyn SignalingObserver>) {
        *self.observer.lock().unwrap() = Some(observer);
    }

    fn get_ice_servers(&self) -> Result<Vec<IceServer>> {
        Ok(self.ice_servers.lock().unwrap().clone())
    }

    fn get_ice_server_by_idx(&self, index: usize, _want_turn: bool) -> Result<IceServerPage> {
        if !self.progressive_ice_supported.load(Ordering::SeqCst) {
            return Err(CoreError::NotImplemented("get_ice_server_by_idx"));
        }
        let servers = self.ice_servers.lock().unwrap();
        Ok(IceServerPage {
            server: servers.get(index).cloned(),
            have_more: index + 1 < servers.len(),
        })
    }

    fn refresh_ice_configuration(&self) -> Result<()> {
        Ok(())
    }

    fn is_ice_refresh_needed(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Builds a well-formed `IceServer` for tests without going through the
/// `BoundedString` constructor at every call site.
pub fn test_ice_server(url: &str) -> IceServer {
    IceServer {
        urls: crate::common::BoundedString::new(url, crate::config::constants::MAX_ICE_CONFIG_URI_LEN).unwrap(),
        username: String::new(),
        credential: String::new(),
    }
}

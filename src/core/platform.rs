//
// SPDX-License-Identifier: Apache-2.0
//

//! Pluggable collaborator interfaces: the peer-connection engine and the
//! signaling transport. Only the contracts live here; concrete
//! implementations (DTLS/SRTP/RTCP/codecs, WebSocket/TLS/SigV4 framing)
//! are out of scope for this crate and are supplied by the embedder. The
//! `sim` module provides test doubles used by this crate's own tests.
//!
//! The source material expresses these as C vtable-plus-opaque-instance
//! pairs; here each collaborator is a Rust trait object, and the "opaque
//! instance" is whatever state a concrete implementation closes over.

use std::fmt;
use std::sync::Arc;

use crate::common::Result;
use crate::core::signaling;

/// An opaque handle to a peer-connection session, owned by the engine.
/// `None` is used where the source models a null session handle (the
/// bridge-mode fast path).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EngineSessionHandle(pub u64);

impl fmt::Display for EngineSessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine-session-{}", self.0)
    }
}

/// Data channel configuration passed at session-creation time.
#[derive(Clone, Debug, Default)]
pub struct DataChannelConfig {
    pub ordered: bool,
    pub label: String,
}

/// Peer-connection lifecycle states reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Observer the core registers with the engine for a *specific session*.
/// Per the dispatcher's session-creation step, the engine must be handed
/// this observer (identified with the `Session`, never the `Context`) so
/// that a failure in one peer's engine session cannot be misattributed to
/// another peer's session.
pub trait EngineSessionObserver: Send + Sync {
    /// The engine produced a message that must go out over signaling.
    fn on_outbound_message(&self, message: signaling::Message);
    /// The engine's peer-connection state changed.
    fn on_state_change(&self, state: PeerConnectionState);
}

/// Observer for data-channel open/message events, installed per session
/// (or per engine client, in bridge mode).
pub trait DataChannelObserver: Send + Sync {
    fn on_open(&self, channel: &str);
    fn on_message(&self, channel: &str, is_binary: bool, data: &[u8]);
}

/// The peer-connection engine collaborator: DTLS/SRTP/RTCP, codec
/// handling, congestion control, and data channels.
pub trait PeerConnectionEngine: Send + Sync {
    fn create_session(
        &self,
        peer_id: &str,
        is_initiator: bool,
        data_channel_config: Option<DataChannelConfig>,
    ) -> Result<EngineSessionHandle>;

    /// Synchronous; collects final stats before returning.
    fn destroy_session(&self, handle: EngineSessionHandle) -> Result<()>;

    fn set_callbacks(&self, handle: EngineSessionHandle, observer: Arc<dyn EngineSessionObserver>);

    /// `handle = None` is the bridge-mode "null session" case.
    fn send_message(&self, handle: Option<EngineSessionHandle>, message: &signaling::Message) -> Result<()>;

    fn set_ice_servers(&self, servers: &[signaling::IceServer]) -> Result<()>;

    fn set_data_channel_callbacks(
        &self,
        _handle: Option<EngineSessionHandle>,
        _observer: Arc<dyn DataChannelObserver>,
    ) -> Result<()> {
        Err(crate::error::CoreError::NotImplemented("set_data_channel_callbacks"))
    }

    fn send_data_channel_message(
        &self,
        _handle: EngineSessionHandle,
        _channel: &str,
        _is_binary: bool,
        _data: &[u8],
    ) -> Result<()> {
        Err(crate::error::CoreError::NotImplemented("send_data_channel_message"))
    }

    /// Whether this engine can create per-peer sessions at all. `false`
    /// means the context must run in bridge mode.
    fn supports_create_session(&self) -> bool {
        true
    }
}

/// Observer the core registers with the signaling transport.
pub trait SignalingObserver: Send + Sync {
    fn on_message_received(&self, message: signaling::Message);
    fn on_state_changed(&self, state: signaling::SignalingState);
    fn on_error(&self, error: signaling::SignalingError);
}

/// Observer for asynchronous ICE server updates (Progressive ICE).
pub trait IceUpdateObserver: Send + Sync {
    fn on_ice_servers_updated(&self, new_count: usize);
}

/// The signaling transport collaborator: the wire protocol to the remote
/// rendezvous service, including authentication, framing, and ICE server
/// credential delivery.
pub trait SignalingTransport: Send + Sync {
    fn connect(&self) -> Result<()>;
    fn disconnect(&self) -> Result<()>;
    fn send_message(&self, message: &signaling::Message) -> Result<()>;
    fn set_callbacks(&self, observer: Arc<dyn SignalingObserver>);
    fn get_ice_servers(&self) -> Result<Vec<signaling::IceServer>>;

    fn set_ice_update_callback(&self, _observer: Arc<dyn IceUpdateObserver>) -> Result<()> {
        Ok(())
    }

    fn set_role_type(&self, _role: crate::common::Role) -> Result<()> {
        Ok(())
    }

    fn get_ice_server_by_idx(&self, _index: usize, _want_turn: bool) -> Result<signaling::IceServerPage> {
        Err(crate::error::CoreError::NotImplemented("get_ice_server_by_idx"))
    }

    fn refresh_ice_configuration(&self) -> Result<()> {
        Err(crate::error::CoreError::NotImplemented("refresh_ice_configuration"))
    }

    fn is_ice_refresh_needed(&self) -> Result<bool> {
        Ok(true)
    }
}

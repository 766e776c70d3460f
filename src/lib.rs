//
// SPDX-License-Identifier: Apache-2.0
//

//! A WebRTC application orchestration core for an embedded KVS WebRTC
//! client: session lifecycle, signaling dispatch, progressive ICE,
//! reconnect, and the single-subscriber event bus.
//!
//! The peer-connection engine (DTLS/SRTP/RTCP/codecs) and the signaling
//! transport (wire protocol to the rendezvous service) are collaborator
//! traits in [`core::platform`], supplied by the embedder. [`sim`]
//! provides in-memory test doubles for both, used by this crate's own
//! tests.

pub mod clock;
pub mod common;
pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "sim")]
pub mod sim;

pub use crate::clock::{Clock, SystemClock, TestClock};
pub use crate::common::{AudioCodec, BoundedString, MediaType, OperatingMode, Result, Role, VideoCodec};
pub use crate::config::{LogLevel, WebRtcConfig};
pub use crate::core::context::WebRtcContext;
pub use crate::core::event_bus::{Event, EventCallback, EventId};
pub use crate::core::platform::{
    DataChannelConfig, DataChannelObserver, EngineSessionHandle, EngineSessionObserver, PeerConnectionEngine,
    PeerConnectionState, SignalingObserver, SignalingTransport,
};
pub use crate::core::signaling::{IceServer, IceServerPage, Message, MessageType, SignalingError, SignalingState};
pub use crate::error::CoreError;

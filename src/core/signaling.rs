//
// SPDX-License-Identifier: Apache-2.0
//

//! The messages exchanged over the signaling channel, and the ICE server
//! records the signaling collaborator hands back to the Progressive ICE
//! controller.

use std::fmt;

use crate::common::{BoundedString, Result};
use crate::config::constants::{MAX_CORRELATION_ID_LEN, MAX_SIGNALING_CLIENT_ID_LEN};
use crate::error::CoreError;

/// The classification of an inbound or outbound signaling message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    Offer,
    Answer,
    IceCandidate,
    IceServerUpdate,
    GoAway,
    Status,
    Error,
}

/// A signaling message, used for both inbound and outbound traffic.
///
/// Inbound messages are borrowed for the duration of a dispatch call;
/// outbound messages are borrowed for the duration of `send_message`. The
/// dispatcher deep-copies anything it needs to retain in a pending queue.
#[derive(Clone, Debug)]
pub struct Message {
    pub message_type: MessageType,
    pub peer_client_id: BoundedString,
    pub correlation_id: Option<BoundedString>,
    pub payload: Vec<u8>,
    pub version: u8,
}

impl Message {
    pub fn new(message_type: MessageType, peer_client_id: &str, payload: impl Into<Vec<u8>>) -> crate::common::Result<Self> {
        Ok(Self {
            message_type,
            peer_client_id: BoundedString::new(peer_client_id, MAX_SIGNALING_CLIENT_ID_LEN)?,
            correlation_id: None,
            payload: payload.into(),
            version: 1,
        })
    }

    pub fn with_correlation_id(mut self, correlation_id: &str) -> crate::common::Result<Self> {
        self.correlation_id = Some(BoundedString::new(correlation_id, MAX_CORRELATION_ID_LEN)?);
        Ok(self)
    }

    /// A heap-owned deep copy, safe to retain past the lifetime of the
    /// caller's borrow (used by the pending queue). Reserves the payload
    /// buffer with `try_reserve_exact` rather than `Vec::clone` so a
    /// failed allocation surfaces as `NotEnoughMemory` instead of aborting.
    pub fn deep_copy(&self) -> Result<Self> {
        let mut payload = Vec::new();
        payload.try_reserve_exact(self.payload.len()).map_err(|_| CoreError::NotEnoughMemory)?;
        payload.extend_from_slice(&self.payload);
        Ok(Self {
            message_type: self.message_type,
            peer_client_id: self.peer_client_id.clone(),
            correlation_id: self.correlation_id.clone(),
            payload,
            version: self.version,
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}(peer={}, {} bytes)",
            self.message_type,
            self.peer_client_id,
            self.payload.len()
        )
    }
}

/// An ICE server record as handed back by the signaling collaborator.
#[derive(Clone, Debug)]
pub struct IceServer {
    pub urls: BoundedString,
    pub username: String,
    pub credential: String,
}

/// The result of `get_ice_server_by_idx`: one server plus whether more
/// are expected to arrive asynchronously (Progressive ICE).
#[derive(Clone, Debug)]
pub struct IceServerPage {
    pub server: Option<IceServer>,
    pub have_more: bool,
}

/// Lifecycle states the signaling transport may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalingState {
    Connecting,
    Connected,
    Disconnected,
}

/// Classified signaling-transport errors, per the error taxonomy.
#[derive(Clone, Debug)]
pub enum SignalingError {
    IceRefreshFailed,
    ReconnectFailed,
    ConnectionLost,
    AuthFailed,
    Other(String),
}

//
// SPDX-License-Identifier: Apache-2.0
//

//! Common types used throughout the orchestration core.

use std::fmt;

use crate::error::CoreError;

/// Common `Result` type used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, CoreError>;

/// The two roles a `WebRtcContext` can be configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Accepts inbound offers and answers them (the KVS "master" side).
    Master,
    /// Originates an offer toward a known peer (the KVS "viewer" side).
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which kind of media a session is expected to carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Video,
    AudioVideo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCodec {
    Opus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoCodec {
    H264,
}

/// Operating mode of the context, replacing the source's
/// `create_session == nullptr` sentinel with a first-class enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    /// Normal mode: the core creates and owns engine sessions per peer.
    Standard,
    /// Bridge mode: signaling messages are forwarded verbatim to the
    /// engine, which owns per-peer state itself.
    Bridge,
}

/// A bounds-checked, owned string used for peer ids, correlation ids,
/// and ICE server URIs. Construction fails rather than silently
/// truncating, per the bounded-string convention.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundedString(String);

impl BoundedString {
    pub fn new(value: impl Into<String>, max_len: usize) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::InvalidArg("bounded string must not be empty".into()));
        }
        if value.len() > max_len {
            return Err(CoreError::InvalidArg(format!(
                "value of length {} exceeds bound of {max_len}",
                value.len()
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for BoundedString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 32-bit identity fingerprint of a peer id, used as a fast equality
/// short-circuit and as the pending-queue key. The full peer id string
/// remains the authoritative key.
pub fn fingerprint(peer_id: &str) -> u32 {
    crc32fast::hash(peer_id.as_bytes())
}

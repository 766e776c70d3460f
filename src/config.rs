//
// SPDX-License-Identifier: Apache-2.0
//

//! Configuration snapshot and implementation-defined limits.
//!
//! Every magic number named in the orchestration core specification is
//! pinned exactly once here, mirroring the teacher crate's convention of
//! top-of-file `const`s (`TIME_OUT_PERIOD_SEC`, `MAX_MESSAGE_AGE_SEC`)
//! rather than scattering literals through the implementation.

use std::time::Duration;

use crate::common::{AudioCodec, MediaType, OperatingMode, Role, VideoCodec};

/// Implementation-defined limits and timings.
pub mod constants {
    use super::Duration;

    /// Maximum number of concurrent sessions a context will admit.
    pub const MAX_SESSIONS: usize = 10;
    /// Maximum number of ICE server records accepted from signaling.
    pub const MAX_ICE_SERVERS: usize = 5;
    /// Maximum length, in bytes, of a peer/client id.
    pub const MAX_SIGNALING_CLIENT_ID_LEN: usize = 256;
    /// Maximum length, in bytes, of a correlation id.
    pub const MAX_CORRELATION_ID_LEN: usize = 128;
    /// Maximum length, in bytes, of an ICE server URI.
    pub const MAX_ICE_CONFIG_URI_LEN: usize = 256;
    /// How long an unclaimed pending queue survives before eviction.
    pub const PENDING_CLEANUP_TTL: Duration = Duration::from_secs(30);
    /// Monitor task cadence.
    pub const SESSION_CLEANUP_PERIOD: Duration = Duration::from_secs(1);
    /// Exponential reconnect back-off table, saturating at the last entry.
    pub const RECONNECT_BACKOFF_SECS: [u64; 5] = [5, 10, 20, 40, 60];
    /// A single signaling connection attempt may not run longer than this.
    pub const CONNECTION_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);
    /// Default STUN server used when signaling cannot supply ICE servers.
    pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";
}

/// Verbosity, mirroring the source's `0..=8` log-level range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogLevel(u8);

impl LogLevel {
    pub const MAX: u8 = 8;

    pub fn new(level: u8) -> Result<Self, crate::error::CoreError> {
        if level > Self::MAX {
            return Err(crate::error::CoreError::InvalidArg(format!(
                "log level {level} out of range 0..={}",
                Self::MAX
            )));
        }
        Ok(Self(level))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// The mutable configuration snapshot owned by a `WebRtcContext`.
#[derive(Clone, Debug)]
pub struct WebRtcConfig {
    pub role: Role,
    pub media_type: MediaType,
    pub audio_codec: AudioCodec,
    pub video_codec: VideoCodec,
    pub trickle_ice: bool,
    pub use_turn: bool,
    pub log_level: LogLevel,
    pub receive_media: bool,
    pub operating_mode: OperatingMode,
}

impl Default for WebRtcConfig {
    fn default() -> Self {
        Self {
            role: Role::Master,
            media_type: MediaType::AudioVideo,
            audio_codec: AudioCodec::Opus,
            video_codec: VideoCodec::H264,
            trickle_ice: true,
            use_turn: true,
            log_level: LogLevel(4),
            receive_media: false,
            operating_mode: OperatingMode::Standard,
        }
    }
}

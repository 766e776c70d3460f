//
// SPDX-License-Identifier: Apache-2.0
//

//! Error taxonomy for the WebRTC application orchestration core.
//!
//! `CoreError` is the single error type returned from every public and
//! internal fallible operation. Collaborator-reported failures are kept
//! as a `#[source]` so callers can walk the chain with
//! `std::error::Error::source()`.

use thiserror::Error;

/// Abstract error kinds, as named in the orchestration core specification.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("null argument")]
    NullArg,
    #[error("invalid argument: {0}")]
    InvalidArg(String),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("context already initialized")]
    AlreadyInitialized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not implemented by collaborator: {0}")]
    NotImplemented(&'static str),
    #[error("not enough memory")]
    NotEnoughMemory,
    #[error("buffer too small")]
    BufferTooSmall,
    #[error("internal error: {0}")]
    Internal(String),
    #[error("operation timed out")]
    Timeout,
    #[error("operation cancelled")]
    Cancelled,
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    // Signaling category.
    #[error("ICE refresh failed")]
    IceRefreshFailed(#[source] Option<Box<CoreError>>),
    #[error("reconnect failed")]
    ReconnectFailed(#[source] Option<Box<CoreError>>),
    #[error("signaling connection lost")]
    ConnectionLost,
    #[error("signaling authentication failed")]
    AuthFailed,
    #[error("signaling error: {0}")]
    SignalingOther(String),

    // Engine category.
    #[error("engine failed to create session")]
    EngineCreate(#[source] Box<CoreError>),
    #[error("engine failed to send message")]
    EngineSend(#[source] Box<CoreError>),
    #[error("engine reported a state error: {0}")]
    EngineState(String),

    #[error("mutex poisoned: {0}")]
    MutexPoisoned(String),
}

impl CoreError {
    /// True if this error represents a programming error that must not
    /// also be raised as an `Error` event (see the propagation rules).
    pub fn is_programming_error(&self) -> bool {
        matches!(self, CoreError::NullArg | CoreError::AlreadyInitialized)
    }
}

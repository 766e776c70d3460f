//
// SPDX-License-Identifier: Apache-2.0
//

//! The per-peer `Session` record and the `SessionRegistry` that owns the
//! session table plus its secondary fingerprint index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use crate::common::{fingerprint, Result};
use crate::config::constants::MAX_SESSIONS;
use crate::core::platform::EngineSessionHandle;
use crate::error::CoreError;

/// Callbacks an embedder installs for a peer's data channel, captured
/// before a `Session` exists (if `set_data_channel_callbacks` is called
/// ahead of the offer) or applied immediately if it already exists.
#[derive(Clone)]
pub struct DataChannelCallbacks {
    pub on_open: Arc<dyn Fn(&str) + Send + Sync>,
    pub on_message: Arc<dyn Fn(&str, bool, &[u8]) + Send + Sync>,
}

/// The core's per-peer record tying a `peer_id` to an engine session
/// handle and lifecycle flags.
pub struct Session {
    pub peer_id: String,
    pub fingerprint: u32,
    /// `None` in bridge mode, where the engine owns per-peer state itself.
    pub engine_session_handle: Option<EngineSessionHandle>,
    pub is_initiator: bool,
    /// Set by the engine's state-change callback (via this session's own
    /// observer, never the context) or by an explicit dispatch failure.
    /// The monitor reaps a session within one cycle of observing this.
    pub terminate_flag: AtomicBool,
    pub first_frame: bool,
    pub offer_receive_time_nanos: u64,
}

impl Session {
    pub fn new(peer_id: &str, is_initiator: bool, engine_session_handle: Option<EngineSessionHandle>, now_nanos: u64) -> Self {
        Self {
            peer_id: peer_id.to_string(),
            fingerprint: fingerprint(peer_id),
            engine_session_handle,
            is_initiator,
            terminate_flag: AtomicBool::new(false),
            first_frame: false,
            offer_receive_time_nanos: now_nanos,
        }
    }

    pub fn mark_for_termination(&self) {
        self.terminate_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_marked_for_termination(&self) -> bool {
        self.terminate_flag.load(Ordering::SeqCst)
    }
}

/// Owns the bounded session table and its `fingerprint(peer_id) -> index`
/// secondary map. The bijection between the two is an invariant enforced
/// by every mutating method: the fingerprint map always reflects exactly
/// the entries present in the ordered table.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Vec<Arc<Session>>,
    by_fingerprint: HashMap<u32, usize>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() >= MAX_SESSIONS
    }

    pub fn find_by_peer_id(&self, peer_id: &str) -> Option<Arc<Session>> {
        self.find_by_fingerprint(fingerprint(peer_id))
            .filter(|s| s.peer_id == peer_id)
    }

    pub fn find_by_fingerprint(&self, fp: u32) -> Option<Arc<Session>> {
        self.by_fingerprint.get(&fp).map(|&idx| self.sessions[idx].clone())
    }

    /// Insert a newly created session. Fails with `InvalidOperation` if a
    /// session already exists for the same fingerprint (duplicate offer)
    /// and with `NotEnoughMemory` if the table is at `MAX_SESSIONS`; both
    /// are checked by the dispatcher before creating the engine session,
    /// so this is a defensive re-check, not the primary enforcement point.
    pub fn insert(&mut self, session: Session) -> Result<Arc<Session>> {
        if self.by_fingerprint.contains_key(&session.fingerprint) {
            return Err(CoreError::InvalidOperation("duplicate session for peer"));
        }
        if self.is_full() {
            return Err(CoreError::NotEnoughMemory);
        }
        let fp = session.fingerprint;
        let arc = Arc::new(session);
        self.sessions.push(arc.clone());
        self.by_fingerprint.insert(fp, self.sessions.len() - 1);
        debug!("session registry: inserted peer={} (count={})", arc.peer_id, self.sessions.len());
        Ok(arc)
    }

    /// Removes the first session with `terminate_flag` set, if any,
    /// returning it so the caller can destroy its engine-side resources
    /// outside the registry's own bookkeeping. Rebuilds the fingerprint
    /// index to stay a bijection with the shifted table.
    pub fn take_first_terminated(&mut self) -> Option<Arc<Session>> {
        let idx = self.sessions.iter().position(|s| s.is_marked_for_termination())?;
        let removed = self.sessions.remove(idx);
        self.by_fingerprint.clear();
        for (i, s) in self.sessions.iter().enumerate() {
            self.by_fingerprint.insert(s.fingerprint, i);
        }
        info!("session registry: reaping peer={}", removed.peer_id);
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Session>> {
        self.sessions.iter()
    }
}

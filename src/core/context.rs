//
// SPDX-License-Identifier: Apache-2.0
//

//! The `WebRtcContext`: the process-wide (well, per-handle) object that
//! owns every session, drives the signaling dispatcher, and exposes the
//! public embedding API.
//!
//! The source models this as a set of global singletons
//! (`gWebRtcAppConfig`, `gSampleConfiguration`, ...). Per the redesign
//! notes this becomes a typed, `Arc`-backed handle returned from `init`
//! and passed explicitly to every call; a process-wide guard is kept only
//! to preserve the "one active context per process" contract that
//! `AlreadyInitialized` depends on, not to hold any real state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::common::{fingerprint, AudioCodec, BoundedString, MediaType, OperatingMode, Result, Role, VideoCodec};
use crate::config::constants::{MAX_SIGNALING_CLIENT_ID_LEN, SESSION_CLEANUP_PERIOD};
use crate::config::{LogLevel, WebRtcConfig};
use crate::core::event_bus::{Event, EventBus, EventCallback, EventId};
use crate::core::ice::IceController;
use crate::core::pending_queue::PendingQueueTable;
use crate::core::platform::{
    DataChannelObserver as EngineDataChannelObserver, EngineSessionHandle, EngineSessionObserver, IceUpdateObserver,
    PeerConnectionEngine, PeerConnectionState, SignalingObserver, SignalingTransport,
};
use crate::core::reconnect::ReconnectController;
use crate::core::session::{DataChannelCallbacks, Session, SessionRegistry};
use crate::core::signaling::{IceServer, Message, MessageType, SignalingError, SignalingState};
use crate::core::sync::{LabeledMutex, Notifier};
use crate::error::CoreError;

/// Guards the "at most one active context per process" contract from the
/// source's global-singleton design; it carries no data, only presence.
static CONTEXT_ACTIVE: AtomicBool = AtomicBool::new(false);

struct ContextState {
    sessions: SessionRegistry,
    pending: PendingQueueTable,
    reconnect: ReconnectController,
    /// Data-channel callbacks registered for a peer before that peer's
    /// session exists, applied as soon as the session is created.
    pending_data_channel_callbacks: std::collections::HashMap<String, DataChannelCallbacks>,
}

pub(crate) struct ContextInner {
    config: LabeledMutex<WebRtcConfig>,
    state: LabeledMutex<ContextState>,
    signaling: Arc<dyn SignalingTransport>,
    engine: Arc<dyn PeerConnectionEngine>,
    events: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
    app_terminate: AtomicBool,
    interrupted: AtomicBool,
    recreate_signaling: AtomicBool,
    connected: AtomicBool,
    monitor_handle: Mutex<Option<JoinHandle<()>>>,
    terminated_once: AtomicBool,
}

impl ContextInner {
    fn now_nanos(&self) -> u64 {
        self.clock.now_nanos()
    }
}

/// A cloneable handle to a `WebRtcContext`. Cloning is cheap (an `Arc`
/// bump); every clone refers to the same underlying sessions, pending
/// queues, and monitor task.
#[derive(Clone)]
pub struct WebRtcContext {
    inner: Arc<ContextInner>,
}

impl WebRtcContext {
    /// Validates collaborators, snapshots configuration, detects bridge
    /// mode, and raises `Initialized`. Fails with `AlreadyInitialized` if
    /// another context handle in this process is still active.
    pub fn init(
        mut config: WebRtcConfig,
        signaling: Arc<dyn SignalingTransport>,
        engine: Arc<dyn PeerConnectionEngine>,
    ) -> Result<Self> {
        Self::init_with_clock(&mut config, signaling, engine, Arc::new(SystemClock::new()))
    }

    /// As `init`, but with an injectable clock; used by tests that need
    /// deterministic control over elapsed time (pending-queue TTL,
    /// reconnect back-off).
    pub fn init_with_clock(
        config: &mut WebRtcConfig,
        signaling: Arc<dyn SignalingTransport>,
        engine: Arc<dyn PeerConnectionEngine>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if CONTEXT_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CoreError::AlreadyInitialized);
        }

        if !engine.supports_create_session() {
            config.operating_mode = OperatingMode::Bridge;
        }
        info!(
            "context: init role={:?} media={:?} mode={:?}",
            config.role, config.media_type, config.operating_mode
        );

        let inner = Arc::new(ContextInner {
            config: LabeledMutex::new(config.clone(), "context.config"),
            state: LabeledMutex::new(ContextState {
                sessions: SessionRegistry::new(),
                pending: PendingQueueTable::new(),
                reconnect: ReconnectController::new(),
                pending_data_channel_callbacks: std::collections::HashMap::new(),
            }, "context.state"),
            signaling,
            engine,
            events: Arc::new(EventBus::new()),
            clock,
            notifier: Notifier::new(),
            app_terminate: AtomicBool::new(false),
            interrupted: AtomicBool::new(false),
            recreate_signaling: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            monitor_handle: Mutex::new(None),
            terminated_once: AtomicBool::new(false),
        });

        inner
            .signaling
            .set_callbacks(Arc::new(ContextSignalingObserver { inner: inner.clone() }));

        let ice_observer = Arc::new(ContextIceObserver { inner: inner.clone() });
        // Optional: transports that don't support progressive updates
        // simply ignore this registration (default trait impl is `Ok(())`).
        let _ = inner.signaling.set_ice_update_callback(ice_observer);

        inner.events.raise(Event::new(EventId::Initialized, 0, None, "context initialized"));

        Ok(Self { inner })
    }

    /// Spawns the single long-lived Monitor Task. Returns once the task
    /// handle is registered; does not block the caller.
    pub fn run(&self) -> Result<()> {
        let mut handle_guard = self
            .inner
            .monitor_handle
            .lock()
            .map_err(|_| CoreError::MutexPoisoned("context.monitor_handle".into()))?;
        if handle_guard.is_some() {
            return Err(CoreError::InvalidState("monitor task already running"));
        }
        let inner = self.inner.clone();
        let handle = std::thread::Builder::new()
            .name("webrtc-monitor".into())
            .spawn(move || crate::core::monitor::run(inner))
            .map_err(|e| CoreError::Internal(format!("failed to spawn monitor task: {e}")))?;
        *handle_guard = Some(handle);
        info!("context: monitor task started");
        Ok(())
    }

    /// Idempotent per run: sets `app_terminate`, disconnects signaling,
    /// destroys every session, and joins the monitor task.
    pub fn terminate(&self) -> Result<()> {
        if self.inner.terminated_once.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("context: terminating");
        self.inner.app_terminate.store(true, Ordering::SeqCst);
        self.inner.notifier.notify_all();

        if let Ok(mut handle_guard) = self.inner.monitor_handle.lock() {
            if let Some(handle) = handle_guard.take() {
                let _ = handle.join();
            }
        }

        let _ = self.inner.signaling.disconnect();

        if let Ok(mut state) = self.inner.state.lock() {
            let peer_ids: Vec<String> = state.sessions.iter().map(|s| s.peer_id.clone()).collect();
            for peer_id in &peer_ids {
                if let Some(session) = state.sessions.find_by_peer_id(peer_id) {
                    session.mark_for_termination();
                }
            }
        }
        // Reuse the monitor's reaper so every session's engine handle is
        // destroyed synchronously before the context is torn down.
        monitor_access::reap_terminated_sessions(&self.inner);

        CONTEXT_ACTIVE.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn set_role(&self, role: Role) -> Result<()> {
        self.inner.config.lock()?.role = role;
        let _ = self.inner.signaling.set_role_type(role);
        Ok(())
    }

    pub fn set_ice_config(&self, trickle_ice: bool, use_turn: bool) -> Result<()> {
        let mut config = self.inner.config.lock()?;
        config.trickle_ice = trickle_ice;
        config.use_turn = use_turn;
        Ok(())
    }

    pub fn set_codecs(&self, audio: AudioCodec, video: VideoCodec) -> Result<()> {
        let mut config = self.inner.config.lock()?;
        config.audio_codec = audio;
        config.video_codec = video;
        Ok(())
    }

    pub fn set_media_type(&self, media_type: MediaType) -> Result<()> {
        self.inner.config.lock()?.media_type = media_type;
        Ok(())
    }

    pub fn enable_media_reception(&self, enabled: bool) -> Result<()> {
        self.inner.config.lock()?.receive_media = enabled;
        Ok(())
    }

    pub fn set_log_level(&self, level: u8) -> Result<()> {
        let level = LogLevel::new(level)?;
        self.inner.config.lock()?.log_level = level;
        Ok(())
    }

    /// Atomically installs or clears the single event subscriber.
    pub fn register_event_callback(&self, callback: Option<EventCallback>) -> Result<()> {
        self.inner.events.register(callback)
    }

    /// Viewer path: looks up or creates a session for `peer_id` and asks
    /// the engine to originate an offer. Calling this twice in a row with
    /// no intervening answer must not create a second session or send a
    /// second offer.
    pub fn trigger_offer(&self, peer_id: &str) -> Result<()> {
        let peer_id_bounded = BoundedString::new(peer_id, MAX_SIGNALING_CLIENT_ID_LEN)?;
        debug!("context: trigger_offer peer={peer_id}");

        let mut state = self.inner.state.lock()?;
        if let Some(existing) = state.sessions.find_by_peer_id(peer_id_bounded.as_str()) {
            info!("context: trigger_offer is a no-op, session already exists for peer={peer_id}");
            let _ = existing;
            return Ok(());
        }

        if state.sessions.is_full() {
            return Err(CoreError::NotEnoughMemory);
        }

        let now = self.inner.now_nanos();
        let handle = self
            .inner
            .engine
            .create_session(peer_id_bounded.as_str(), true, None)
            .map_err(|e| CoreError::EngineCreate(Box::new(e)))?;

        let session = Session::new(peer_id_bounded.as_str(), true, Some(handle), now);
        let session = state.sessions.insert(session)?;
        drop(state);

        self.install_session_observer(&session, handle);
        self.apply_pending_data_channel_callbacks(peer_id_bounded.as_str(), Some(handle));
        let _ = IceController::trigger(self.inner.signaling.as_ref(), self.inner.engine.as_ref(), "trigger_offer", true);

        self.inner
            .events
            .raise(Event::new(EventId::SentOffer, 0, Some(peer_id), "offer requested"));
        Ok(())
    }

    /// Stores callbacks for a peer's data channel. Applied immediately if
    /// a session already exists for `peer_id`; otherwise captured in the
    /// pending-configuration table and applied the moment that peer's
    /// session is created (by `handle_offer` or `trigger_offer`).
    pub fn set_data_channel_callbacks(
        &self,
        peer_id: &str,
        on_open: Arc<dyn Fn(&str) + Send + Sync>,
        on_message: Arc<dyn Fn(&str, bool, &[u8]) + Send + Sync>,
    ) -> Result<()> {
        let callbacks = DataChannelCallbacks { on_open, on_message };

        let mut state = self.inner.state.lock()?;
        if let Some(session) = state.sessions.find_by_peer_id(peer_id) {
            let handle = session.engine_session_handle;
            drop(state);
            let observer = Arc::new(DataChannelObserverAdapter { callbacks });
            return self.inner.engine.set_data_channel_callbacks(handle, observer);
        }
        debug!("context: no session yet for peer={peer_id}, queuing data channel callbacks");
        state.pending_data_channel_callbacks.insert(peer_id.to_string(), callbacks);
        Ok(())
    }

    /// Applies any data-channel callbacks queued for `peer_id` before its
    /// session existed. Called right after a session is created.
    fn apply_pending_data_channel_callbacks(&self, peer_id: &str, handle: Option<EngineSessionHandle>) {
        let callbacks = match self.inner.state.lock() {
            Ok(mut state) => state.pending_data_channel_callbacks.remove(peer_id),
            Err(_) => None,
        };
        if let Some(callbacks) = callbacks {
            let observer = Arc::new(DataChannelObserverAdapter { callbacks });
            if let Err(err) = self.inner.engine.set_data_channel_callbacks(handle, observer) {
                warn!("context: failed to apply queued data channel callbacks for peer={peer_id}: {err}");
            }
        }
    }

    pub fn send_data_channel_message(&self, peer_id: &str, channel: &str, is_binary: bool, data: &[u8]) -> Result<()> {
        let state = self.inner.state.lock()?;
        let session = state
            .sessions
            .find_by_peer_id(peer_id)
            .ok_or_else(|| CoreError::NotFound(format!("no session for peer {peer_id}")))?;
        let handle = session
            .engine_session_handle
            .ok_or_else(|| CoreError::NotImplemented("send_data_channel_message in bridge mode"))?;
        drop(state);
        self.inner.engine.send_data_channel_message(handle, channel, is_binary, data)
    }

    pub fn get_ice_servers(&self) -> Result<Vec<IceServer>> {
        self.inner.signaling.get_ice_servers()
    }

    /// Entry point for the signaling reader task: classifies and routes
    /// one inbound message. All dispatch is serialized on the context
    /// mutex.
    pub fn dispatch_inbound(&self, message: Message) -> Result<()> {
        let config = self.inner.config.lock()?;
        let bridge_mode = config.operating_mode == OperatingMode::Bridge;
        drop(config);

        if bridge_mode {
            debug!("dispatcher: bridge mode, forwarding {} verbatim", message.message_type_name());
            return self.inner.engine.send_message(None, &message);
        }

        match message.message_type {
            MessageType::Offer => self.handle_offer(message),
            MessageType::Answer => self.handle_answer(message),
            MessageType::IceCandidate => self.handle_ice_candidate(message),
            _ => {
                warn!("dispatcher: dropping unsupported message type {:?}", message.message_type);
                Ok(())
            }
        }
    }

    fn handle_offer(&self, message: Message) -> Result<()> {
        let peer_id = message.peer_client_id.as_str().to_string();
        let fp = fingerprint(&peer_id);
        self.inner
            .events
            .raise(Event::new(EventId::ReceivedOffer, 0, Some(&peer_id), "offer received"));

        let mut state = self.inner.state.lock()?;
        if state.sessions.find_by_fingerprint(fp).is_some() {
            return Err(CoreError::InvalidOperation("duplicate offer for peer"));
        }

        if state.sessions.is_full() {
            warn!("dispatcher: session table full, dropping offer for peer={peer_id}");
            state.pending.discard(fp);
            return Ok(());
        }

        let now = self.inner.now_nanos();
        let handle = match self.inner.engine.create_session(&peer_id, false, None) {
            Ok(h) => h,
            Err(err) => {
                error!("dispatcher: engine.create_session failed for peer={peer_id}: {err}");
                return Err(CoreError::EngineCreate(Box::new(err)));
            }
        };

        let session = Session::new(&peer_id, false, Some(handle), now);
        let session = state.sessions.insert(session)?;
        drop(state);

        self.install_session_observer(&session, handle);
        self.apply_pending_data_channel_callbacks(&peer_id, Some(handle));

        let _ = IceController::trigger(self.inner.signaling.as_ref(), self.inner.engine.as_ref(), "new session", true);

        self.inner
            .events
            .raise(Event::new(EventId::PeerConnectionRequested, 0, Some(&peer_id), "session created"));

        if let Err(err) = self.inner.engine.send_message(Some(handle), &message) {
            warn!("dispatcher: forwarding offer to engine failed for peer={peer_id}: {err}");
            session.mark_for_termination();
            self.inner.notifier.notify_all();
            return Err(CoreError::EngineSend(Box::new(err)));
        }

        self.drain_pending(fp, handle)?;

        self.inner
            .events
            .raise(Event::new(EventId::SentAnswer, 0, Some(&peer_id), "answer sent"));
        Ok(())
    }

    fn handle_answer(&self, message: Message) -> Result<()> {
        let peer_id = message.peer_client_id.as_str().to_string();
        let state = self.inner.state.lock()?;
        let session = state
            .sessions
            .find_by_peer_id(&peer_id)
            .ok_or(CoreError::InvalidOperation("no session for answer"))?;
        drop(state);

        let _ = IceController::trigger(self.inner.signaling.as_ref(), self.inner.engine.as_ref(), "answer processing", true);

        let handle = session.engine_session_handle;
        self.inner.engine.send_message(handle, &message).map_err(|e| CoreError::EngineSend(Box::new(e)))?;
        if let Some(handle) = handle {
            self.drain_pending(session.fingerprint, handle)?;
        }
        Ok(())
    }

    fn handle_ice_candidate(&self, message: Message) -> Result<()> {
        let peer_id = message.peer_client_id.as_str().to_string();
        let fp = fingerprint(&peer_id);

        let state = self.inner.state.lock()?;
        if let Some(session) = state.sessions.find_by_fingerprint(fp) {
            let handle = session.engine_session_handle;
            drop(state);
            return self
                .inner
                .engine
                .send_message(handle, &message)
                .map_err(|e| CoreError::EngineSend(Box::new(e)));
        }
        drop(state);

        let copy = message.deep_copy()?;
        let mut state = self.inner.state.lock()?;
        let now = self.inner.now_nanos();
        let queue = state.pending.fetch_or_create(fp, now);
        queue.push(copy)?;
        Ok(())
    }

    /// Replays any queued orphan messages for `fingerprint` into the
    /// engine, in FIFO arrival order, now that a session exists.
    fn drain_pending(&self, fingerprint: u32, handle: EngineSessionHandle) -> Result<()> {
        let mut state = self.inner.state.lock()?;
        let drained = state.pending.take_drained(fingerprint);
        drop(state);
        for msg in drained {
            if let Err(err) = self.inner.engine.send_message(Some(handle), &msg) {
                warn!("dispatcher: failed to replay queued message: {err}");
            }
        }
        Ok(())
    }

    fn install_session_observer(&self, session: &Arc<Session>, handle: EngineSessionHandle) {
        let observer = Arc::new(SessionObserver {
            session: session.clone(),
            inner: self.inner.clone(),
        });
        self.inner.engine.set_callbacks(handle, observer);
    }

    pub(crate) fn inner(&self) -> &Arc<ContextInner> {
        &self.inner
    }

    /// Runs one Monitor Task cycle synchronously: reap terminated
    /// sessions, step the reconnect controller if signaling needs
    /// recreating, and evict expired pending queues. Exposed so tests
    /// driving time through an injected clock can exercise the monitor's
    /// logic deterministically instead of spawning the real monitor
    /// thread and sleeping in real time.
    #[cfg(feature = "sim")]
    pub fn run_maintenance_once(&self) {
        monitor_access::reap_terminated_sessions(&self.inner);
        if monitor_access::recreate_signaling(&self.inner) {
            monitor_access::run_reconnect_step(&self.inner);
        }
        monitor_access::evict_expired_pending(&self.inner);
    }
}

impl Message {
    fn message_type_name(&self) -> &'static str {
        match self.message_type {
            MessageType::Offer => "OFFER",
            MessageType::Answer => "ANSWER",
            MessageType::IceCandidate => "ICE_CANDIDATE",
            MessageType::IceServerUpdate => "ICE_SERVER_UPDATE",
            MessageType::GoAway => "GO_AWAY",
            MessageType::Status => "STATUS",
            MessageType::Error => "ERROR",
        }
    }
}

/// Installed per engine session; holds the `Session`, never the context,
/// so a failure reported for one peer can only ever mark that peer's
/// session for termination.
struct SessionObserver {
    session: Arc<Session>,
    inner: Arc<ContextInner>,
}

impl EngineSessionObserver for SessionObserver {
    fn on_outbound_message(&self, message: Message) {
        if let Err(err) = self.inner.signaling.send_message(&message) {
            warn!("session observer: failed to send outbound message for peer={}: {err}", self.session.peer_id);
        }
    }

    fn on_state_change(&self, state: PeerConnectionState) {
        debug!("session observer: peer={} state={:?}", self.session.peer_id, state);
        match state {
            PeerConnectionState::Connected => {
                self.inner
                    .events
                    .raise(Event::new(EventId::PeerConnected, 0, Some(&self.session.peer_id), "peer connected"));
            }
            PeerConnectionState::Disconnected | PeerConnectionState::Failed | PeerConnectionState::Closed => {
                self.session.mark_for_termination();
                self.inner.notifier.notify_all();
                self.inner
                    .events
                    .raise(Event::new(EventId::PeerDisconnected, 0, Some(&self.session.peer_id), "peer disconnected"));
            }
            PeerConnectionState::Connecting => {}
        }
    }
}

struct DataChannelObserverAdapter {
    callbacks: DataChannelCallbacks,
}

impl EngineDataChannelObserver for DataChannelObserverAdapter {
    fn on_open(&self, channel: &str) {
        (self.callbacks.on_open)(channel);
    }

    fn on_message(&self, channel: &str, is_binary: bool, data: &[u8]) {
        (self.callbacks.on_message)(channel, is_binary, data);
    }
}

/// Forwards signaling-transport callbacks into the dispatcher / reconnect
/// controller / event bus.
struct ContextSignalingObserver {
    inner: Arc<ContextInner>,
}

impl SignalingObserver for ContextSignalingObserver {
    fn on_message_received(&self, message: Message) {
        let ctx = WebRtcContext { inner: self.inner.clone() };
        if let Err(err) = ctx.dispatch_inbound(message) {
            warn!("dispatcher: inbound dispatch failed: {err}");
            self.inner
                .events
                .raise(Event::new(EventId::Error, 0, None, err.to_string()));
        }
    }

    fn on_state_changed(&self, state: SignalingState) {
        match state {
            SignalingState::Connecting => {
                self.inner
                    .events
                    .raise(Event::new(EventId::SignalingConnecting, 0, None, "connecting"));
            }
            SignalingState::Connected => {
                self.inner.connected.store(true, Ordering::SeqCst);
                self.inner.recreate_signaling.store(false, Ordering::SeqCst);
                if let Ok(mut state) = self.inner.state.lock() {
                    state.reconnect.on_connected();
                }
                self.inner
                    .events
                    .raise(Event::new(EventId::SignalingConnected, 0, None, "connected"));
            }
            SignalingState::Disconnected => {
                self.inner.connected.store(false, Ordering::SeqCst);
                self.inner
                    .events
                    .raise(Event::new(EventId::SignalingDisconnected, 0, None, "disconnected"));
            }
        }
    }

    fn on_error(&self, error: SignalingError) {
        let (set_recreate, message) = match &error {
            SignalingError::IceRefreshFailed => (true, "ICE refresh failed"),
            SignalingError::ReconnectFailed => (true, "reconnect failed"),
            SignalingError::ConnectionLost => (true, "connection lost"),
            SignalingError::AuthFailed => (true, "authentication failed"),
            SignalingError::Other(_) => (false, "signaling error"),
        };
        if set_recreate {
            self.inner.recreate_signaling.store(true, Ordering::SeqCst);
            self.inner.notifier.notify_all();
        }
        error!("signaling observer: {message}");
        self.inner
            .events
            .raise(Event::new(EventId::SignalingError, 0, None, message));
    }
}

struct ContextIceObserver {
    inner: Arc<ContextInner>,
}

impl IceUpdateObserver for ContextIceObserver {
    fn on_ice_servers_updated(&self, new_count: usize) {
        if let Err(err) = IceController::on_ice_servers_updated(self.inner.signaling.as_ref(), self.inner.engine.as_ref(), new_count) {
            warn!("ice observer: propagating updated servers failed: {err}");
        }
    }
}

/// Internal accessors used only by the monitor task; kept in this module
/// so `ContextInner`'s fields stay private to `context.rs`.
pub(crate) mod monitor_access {
    use super::*;

    pub(crate) fn app_terminate(inner: &ContextInner) -> bool {
        inner.app_terminate.load(Ordering::SeqCst)
    }

    pub(crate) fn recreate_signaling(inner: &ContextInner) -> bool {
        inner.recreate_signaling.load(Ordering::SeqCst)
    }

    pub(crate) fn now_nanos(inner: &ContextInner) -> u64 {
        inner.now_nanos()
    }

    pub(crate) fn wait(inner: &ContextInner, timeout: std::time::Duration) {
        inner.notifier.wait_timeout(timeout);
    }

    pub(crate) fn reap_terminated_sessions(inner: &ContextInner) {
        loop {
            let removed = match inner.state.lock() {
                Ok(mut state) => state.sessions.take_first_terminated(),
                Err(_) => return,
            };
            match removed {
                Some(session) => {
                    if let Some(handle) = session.engine_session_handle {
                        if let Err(err) = inner.engine.destroy_session(handle) {
                            warn!("monitor: destroy_session failed for peer={}: {err}", session.peer_id);
                        }
                    }
                }
                None => break,
            }
        }
    }

    pub(crate) fn run_reconnect_step(inner: &ContextInner) {
        let now = inner.now_nanos();
        let outcome = match inner.state.lock() {
            Ok(mut state) => state.reconnect.step(inner.signaling.as_ref(), now),
            Err(_) => return,
        };
        debug!("monitor: reconnect step -> {outcome:?}");
    }

    pub(crate) fn evict_expired_pending(inner: &ContextInner) {
        let now = inner.now_nanos();
        if let Ok(mut state) = inner.state.lock() {
            state.pending.evict_expired(now);
        }
    }

    pub(crate) fn cleanup_period() -> std::time::Duration {
        SESSION_CLEANUP_PERIOD
    }
}

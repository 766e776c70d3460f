//
// SPDX-License-Identifier: Apache-2.0
//

//! Common test utilities. Requires the `sim` feature.

use std::sync::{Arc, Once};

use webrtc_app_core::sim::{SimPeerConnectionEngine, SimSignalingTransport};
use webrtc_app_core::{PeerConnectionEngine, SignalingTransport, TestClock, WebRtcConfig, WebRtcContext};

static LOG_INIT: Once = Once::new();

pub fn init_logging() {
    LOG_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A fully wired context plus the test doubles it was built on, so a
/// scenario can both drive the context's public API and inspect/forge
/// traffic on its collaborators.
pub struct TestHarness {
    pub context: WebRtcContext,
    pub signaling: Arc<SimSignalingTransport>,
    pub engine: Arc<SimPeerConnectionEngine>,
    pub clock: TestClock,
}

impl TestHarness {
    /// Builds a harness around a standard-mode engine (one that supports
    /// per-peer sessions).
    pub fn new(config: WebRtcConfig) -> Self {
        init_logging();
        let signaling = SimSignalingTransport::new();
        let engine = SimPeerConnectionEngine::new();
        let clock = TestClock::new();
        let mut config = config;
        let context = WebRtcContext::init_with_clock(
            &mut config,
            signaling.clone() as Arc<dyn SignalingTransport>,
            engine.clone() as Arc<dyn PeerConnectionEngine>,
            Arc::new(clock.clone()),
        )
        .expect("context init must succeed in a freshly-initialized test process");
        Self {
            context,
            signaling,
            engine,
            clock,
        }
    }

    /// Builds a harness around a bridge-mode engine, i.e. one that does
    /// not support per-peer sessions.
    pub fn new_bridge(config: WebRtcConfig) -> Self {
        init_logging();
        let signaling = SimSignalingTransport::new();
        let engine = SimPeerConnectionEngine::new_bridge();
        let clock = TestClock::new();
        let mut config = config;
        let context = WebRtcContext::init_with_clock(
            &mut config,
            signaling.clone() as Arc<dyn SignalingTransport>,
            engine.clone() as Arc<dyn PeerConnectionEngine>,
            Arc::new(clock.clone()),
        )
        .expect("context init must succeed in a freshly-initialized test process");
        Self {
            context,
            signaling,
            engine,
            clock,
        }
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = self.context.terminate();
    }
}

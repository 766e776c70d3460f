//
// SPDX-License-Identifier: Apache-2.0
//

//! The Monitor Task: the single long-lived task that reaps terminated
//! sessions, drives the reconnect controller, and evicts stale pending
//! queues, on a fixed cadence bounded by `SESSION_CLEANUP_PERIOD`.

use std::sync::Arc;

use log::info;

use crate::core::context::{monitor_access as ctx, ContextInner};

/// Runs until `app_terminate` is observed. Each iteration is one pass of
/// reap -> reconnect -> evict -> bounded wait, matching the cadence
/// described for the session registry and monitor design.
pub(crate) fn run(inner: Arc<ContextInner>) {
    info!("monitor: task started");
    while !ctx::app_terminate(&inner) {
        ctx::reap_terminated_sessions(&inner);

        if ctx::recreate_signaling(&inner) {
            ctx::run_reconnect_step(&inner);
        }

        ctx::evict_expired_pending(&inner);

        ctx::wait(&inner, ctx::cleanup_period());
    }
    info!("monitor: task exiting");
}

//
// SPDX-License-Identifier: Apache-2.0
//

//! Progressive ICE: return STUN immediately, fetch TURN credentials in
//! the background, and propagate updated server lists to the engine.

use log::{debug, warn};

use crate::common::{BoundedString, Result};
use crate::config::constants::DEFAULT_STUN_URL;
use crate::core::platform::{PeerConnectionEngine, SignalingTransport};
use crate::core::signaling::IceServer;
use crate::error::CoreError;

pub struct IceController;

impl IceController {
    /// Triggers ICE gathering for `context_label` (a short description of
    /// why the refresh was requested, used only for logging).
    pub fn trigger(
        signaling: &dyn SignalingTransport,
        engine: &dyn PeerConnectionEngine,
        context_label: &str,
        want_turn: bool,
    ) -> Result<()> {
        match signaling.get_ice_server_by_idx(0, want_turn) {
            Ok(page) => {
                debug!(
                    "ice controller: progressive fetch for '{context_label}' returned server={}, have_more={}",
                    page.server.is_some(),
                    page.have_more
                );
                if let Some(server) = page.server {
                    engine.set_ice_servers(std::slice::from_ref(&server))?;
                }
                Ok(())
            }
            Err(CoreError::NotImplemented(_)) => {
                debug!("ice controller: signaling lacks progressive ICE, falling back to static STUN for '{context_label}'");
                let stun = IceServer {
                    urls: BoundedString::new(DEFAULT_STUN_URL, crate::config::constants::MAX_ICE_CONFIG_URI_LEN)?,
                    username: String::new(),
                    credential: String::new(),
                };
                engine.set_ice_servers(std::slice::from_ref(&stun))?;
                match signaling.refresh_ice_configuration() {
                    Ok(()) | Err(CoreError::NotImplemented(_)) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            Err(err) => {
                warn!("ice controller: progressive fetch failed for '{context_label}': {err}");
                Err(err)
            }
        }
    }

    /// Invoked when the signaling transport reports a change in the
    /// available ICE server count. Compacts out holes (empty URLs) before
    /// propagating to the engine.
    pub fn on_ice_servers_updated(
        signaling: &dyn SignalingTransport,
        engine: &dyn PeerConnectionEngine,
        new_count: usize,
    ) -> Result<()> {
        if new_count == 0 {
            return Ok(());
        }
        let servers = signaling.get_ice_servers()?;
        let valid: Vec<IceServer> = servers.into_iter().filter(|s| !s.urls.as_str().is_empty()).collect();
        debug!("ice controller: propagating {} valid server(s) of {new_count} reported", valid.len());
        engine.set_ice_servers(&valid)
    }

    /// Pure query; on any failure the answer defaults to `true` (fail
    /// open, matching the source's documented default).
    pub fn is_refresh_needed(signaling: &dyn SignalingTransport) -> bool {
        signaling.is_ice_refresh_needed().unwrap_or(true)
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Session lifecycle and the connection state machine (spec.md §4.E,
//! §4.G): `offline -> local -> join:pending -> connected -> disconnected
//! -> offline`.

use context::{NetStatus, PeerCtx};

use crate::api::Engine;
use crate::error::{EngineError, Result};

impl Engine {
    /// Sets which peer id this engine instance plays as. Not an explicit
    /// boundary op in spec.md §6 (which leaves peer identity assignment
    /// to the transport/lobby layer) but needed before `session_init` for
    /// any non-peer-0 instance.
    pub fn set_local_peer_id(&mut self, peer_id: u8) {
        self.ctx.net.local_peer_id = peer_id;
    }

    pub fn status(&self) -> NetStatus {
        self.ctx.net.status()
    }

    pub fn set_status(&mut self, status: NetStatus) {
        self.ctx.net.set_status(status);
    }

    /// spec.md §4.E `session_init(peer_count, user_data_len)`.
    pub fn session_init(&mut self, peer_count: u8, user_data_len: usize) {
        self.ctx.net.in_session = 1;
        self.ctx.net.session_start_frame = self.ctx.time.frame + 1;
        self.ctx.net.match_frame = 0;
        self.ctx.net.peer_count = peer_count;
        self.ctx.net.last_rollback_depth = 0;
        self.ctx.net.total_rollbacks = 0;
        self.ctx.net.frames_resimulated = 0;
        for peer in self.ctx.net.peers.iter_mut().take(peer_count as usize) {
            *peer = PeerCtx::disconnected();
            peer.connected = 1;
        }
        for peer in self.ctx.net.peers.iter_mut().skip(peer_count as usize) {
            *peer = PeerCtx::disconnected();
        }

        self.user_blob = vec![0u8; user_data_len];
        self.snapshots.clear();
        self.predicted.clear();
        self.earliest_new_remote_frame = None;
        self.local_event_log.clear();
        self.filled_up_to = [None; context::input::MAX_PLAYERS];
        self.future_remote_events.clear();

        // Connected requires at least two peers' rings initialized
        // (spec.md §4.G).
        if peer_count >= 2 {
            self.set_status(NetStatus::Connected);
        } else {
            self.set_status(NetStatus::Local);
        }

        let base_snapshot_frame = 0;
        self.snapshots.insert(base_snapshot_frame, self.take_snapshot());

        log::info!("session_init: peer_count={peer_count} session_start_frame={}", self.ctx.net.session_start_frame);
    }

    /// spec.md §4.E `session_end`: clears `in_session`; ring slots are
    /// retained for a post-mortem tape.
    pub fn session_end(&mut self) {
        self.ctx.net.in_session = 0;
        self.set_status(NetStatus::Offline);
        log::info!("session_end");
    }

    pub(crate) fn require_in_session(&self) -> Result<()> {
        if self.ctx.net.in_session == 0 {
            return Err(EngineError::SessionNotInitialized);
        }
        Ok(())
    }

    /// Drives the `offline -> local -> join:pending -> connected ->
    /// disconnected -> offline` state machine from the user-set
    /// `wants_room_code`/`wants_disconnect` fields (spec.md §4.A, §4.G).
    /// Called once per tick, so writes from user code take effect at the
    /// next frame boundary as spec.md §4.A requires.
    ///
    /// `join:pending -> connected` is left to `session_init` (the host's
    /// equivalent of the external transport reporting `join:ok`, which
    /// spec.md places outside this core).
    pub(crate) fn apply_net_intents(&mut self) {
        let net = &mut self.ctx.net;
        if net.wants_disconnect != 0 {
            net.wants_disconnect = 0;
            if net.status() != NetStatus::Offline {
                net.set_status(NetStatus::Disconnected);
                log::info!("session: wants_disconnect observed, transitioning to disconnected");
            }
            return;
        }

        match net.status() {
            NetStatus::Disconnected => net.set_status(NetStatus::Offline),
            NetStatus::Offline if net.wants_room_code[0] != 0 => {
                net.room_code = net.wants_room_code;
                net.wants_room_code = [0; 8];
                net.set_status(NetStatus::JoinPending);
                log::info!("session: wants_room_code observed, transitioning to join:pending");
            }
            _ => {}
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Remote-input prediction (spec.md §4.D): when `step` reaches a frame a
//! remote peer has not yet sent data for, repeat their last known input
//! rather than stalling the local simulation.

use context::{Event, PlayerInput};

use crate::api::Engine;
use crate::input_pipeline::derive_frame_input;

impl Engine {
    /// Apply a remote peer's events for `frame`, overwriting whatever the
    /// ring slot currently holds (prediction or otherwise).
    pub(crate) fn apply_remote_frame(&mut self, peer: u8, frame: u32, events: &[Event]) {
        let peer_idx = peer as usize;
        let prev = if frame == 0 { PlayerInput::default() } else { *self.ring.get(peer_idx, frame - 1) };
        let derived = derive_frame_input(prev, events);
        self.predicted.remove(&(peer, frame));
        self.ring.set(peer_idx, frame, derived);
        self.filled_up_to[peer_idx] = Some(self.filled_up_to[peer_idx].map_or(frame, |f| f.max(frame)));
    }

    /// For every connected remote peer without data for `frame` yet, either
    /// apply events buffered ahead of time in `future_remote_events`, or
    /// predict by repeating the previous frame's input (spec.md §4.D).
    pub(crate) fn ensure_remote_predictions(&mut self, frame: u32) {
        let local_peer = self.ctx.net.local_peer_id;
        let peer_count = self.ctx.net.peer_count;
        for peer in 0..peer_count {
            if peer == local_peer || self.ctx.net.peers[peer as usize].connected == 0 {
                continue;
            }
            if self.filled_up_to[peer as usize].is_some_and(|f| f >= frame) {
                continue;
            }

            if let Some(bucket) = self.future_remote_events.get_mut(&frame) {
                if let Some(pos) = bucket.iter().position(|(p, _)| *p == peer) {
                    let (_, events) = bucket.remove(pos);
                    self.apply_remote_frame(peer, frame, &events);
                    if bucket.is_empty() {
                        self.future_remote_events.remove(&frame);
                    }
                    continue;
                }
            }

            let peer_idx = peer as usize;
            let prev = if frame == 0 { PlayerInput::default() } else { *self.ring.get(peer_idx, frame - 1) };
            let predicted = derive_frame_input(prev, &[]);
            self.ring.set(peer_idx, frame, predicted);
            self.predicted.insert((peer, frame));
            self.filled_up_to[peer_idx] = Some(frame);
        }
    }

    /// Re-derive any still-predicted ring slot at `frame` from its
    /// (possibly just-corrected) previous frame. Called while
    /// resimulating after a rollback, so a correction earlier in the
    /// window propagates forward through frames that were predicted
    /// before it arrived (spec.md §4.E step 6).
    pub(crate) fn refresh_stale_predictions(&mut self, frame: u32) {
        let local_peer = self.ctx.net.local_peer_id;
        let peer_count = self.ctx.net.peer_count;
        for peer in 0..peer_count {
            if peer == local_peer || !self.predicted.contains(&(peer, frame)) {
                continue;
            }
            let peer_idx = peer as usize;
            let prev = if frame == 0 { PlayerInput::default() } else { *self.ring.get(peer_idx, frame - 1) };
            self.ring.set(peer_idx, frame, derive_frame_input(prev, &[]));
        }
    }
}

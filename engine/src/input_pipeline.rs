// SPDX-License-Identifier: Apache-2.0

//! Per-frame input derivation (spec.md §4.B): folding a frame's raw
//! events onto the previous frame's `PlayerInput`, applied uniformly to
//! local assembly, remote ingestion, and prediction.

use context::input::MAX_PLAYERS;
use context::{Event, PlayerInput};

use crate::api::Engine;
use crate::systems::UserSystemCtx;

/// `(previous ∧ clear-transient-bits) ⊕ events`, spec.md §4.B.
pub(crate) fn derive_frame_input(prev: PlayerInput, events: &[Event]) -> PlayerInput {
    let mut next = prev;
    next.begin_frame();
    for event in events {
        next.apply_event(event);
    }
    next
}

impl Engine {
    /// Drain events collected by `emit_*` since the last step into the
    /// local peer's ring slot for `frame`, and record them for the
    /// packet/tape event logs.
    pub(crate) fn assemble_local_input(&mut self, frame: u32) {
        let local_peer = self.ctx.net.local_peer_id as usize;
        let events = std::mem::take(&mut self.pending_local_events);

        let prev = if frame == 0 { PlayerInput::default() } else { *self.ring.get(local_peer, frame - 1) };
        let derived = derive_frame_input(prev, &events);
        self.ring.set(local_peer, frame, derived);
        self.ctx.input.players[local_peer] = derived;
        self.filled_up_to[local_peer] = Some(self.filled_up_to[local_peer].map_or(frame, |f| f.max(frame)));

        if !events.is_empty() {
            self.local_event_log.entry(frame).or_default().extend(events.iter().copied());
            if let Some(tape) = self.tape.as_mut() {
                for event in &events {
                    tape.record_event(frame, local_peer as u8, *event);
                }
            }
        }
    }

    /// Events this engine has locally emitted for `frame`, for
    /// `protocol::EventSource`.
    pub(crate) fn local_events_for_frame(&self, frame: u32) -> &[Event] {
        self.local_event_log.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Copy every peer's ring-stored input for `frame` into the live
    /// `InputCtx`, invoke the registered systems, and snapshot the result
    /// under key `frame + 1` (each snapshot key holds the state *before*
    /// that key's frame runs, so key 0 is the pre-session state installed
    /// by `session_init`). Shared by the normal tick path, rollback
    /// resimulation, and `seek`'s tape replay (spec.md §4.E steps 5-6).
    ///
    /// Which peers get refreshed is driven by `filled_up_to`, not by
    /// `peer_count`/`connected`: those are only meaningful in-session, but
    /// `seek` can replay a tape recorded with no session at all (spec.md
    /// §8 scenario 6), where the local peer's ring data is the only thing
    /// that exists.
    pub(crate) fn run_frame(&mut self, frame: u32, is_resimulating: bool) {
        for peer in 0..MAX_PLAYERS {
            if self.filled_up_to[peer].is_some_and(|filled| filled >= frame) {
                self.ctx.input.players[peer] = *self.ring.get(peer, frame);
            }
        }

        let system_count = self.systems.system_count();
        for system_id in 0..system_count {
            let mut ctx = UserSystemCtx {
                time: &self.ctx.time,
                input: &self.ctx.input,
                net: &self.ctx.net,
                rand: &mut self.ctx.rand,
                screen: &self.ctx.screen,
                user_blob: &mut self.user_blob,
                is_resimulating,
            };
            self.systems.invoke(system_id, &mut ctx);
        }

        let snapshot = self.take_snapshot();
        self.snapshots.insert(frame + 1, snapshot);
        if let Some(tape) = self.tape.as_mut() {
            tape.advance_frame();
        }
    }
}

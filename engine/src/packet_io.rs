// SPDX-License-Identifier: Apache-2.0

//! Wire boundary (spec.md §4.F, §6 `receive_packet`/`build_outbound_packet`):
//! decoding inbound packets into ring corrections and encoding outbound
//! packets from the local event log.

use std::collections::BTreeMap;

use context::input::MAX_PLAYERS;
use context::{Event, EventKind, Source};
use protocol::{EventSource, OutboundPacket};

use crate::api::Engine;
use crate::error::{EngineError, Result};

impl EventSource for Engine {
    fn events_for_frame(&self, frame: u32) -> &[Event] {
        self.local_events_for_frame(frame)
    }
}

impl Engine {
    /// spec.md §6 `receive_packet`: ingest a decoded packet from `peer`.
    ///
    /// Malformed packets and packets from a peer we don't have a slot for
    /// are dropped and counted (`packets_dropped`), surfaced to the host as
    /// an error return rather than silently swallowed. A stale packet (its
    /// `seq` no greater than what we already have from `peer`) still
    /// advances `peer.ack`, since the remote's acknowledgement of our data
    /// is independent of whether their own payload is a duplicate. A
    /// packet whose `seq` is strictly *less* than what we already have
    /// (not just a repeat) is a protocol bug — spec.md §4.E's confirmed
    /// frame monotonicity — and is counted separately as a
    /// `ConfirmedFrameRegression` rather than a quiet duplicate.
    pub fn receive_packet(&mut self, peer: u8, bytes: &[u8]) -> Result<()> {
        if let Some(tape) = self.tape.as_mut() {
            tape.record_packet(self.ctx.net.match_frame, peer, bytes);
        }

        let packet = match OutboundPacket::from_bytes(bytes) {
            Ok(packet) => packet,
            Err(err) => {
                self.packets_dropped += 1;
                return Err(EngineError::Protocol(err));
            }
        };

        let peer_idx = peer as usize;
        if peer_idx >= MAX_PLAYERS
            || peer_idx >= self.ctx.net.peer_count as usize
            || self.ctx.net.peers[peer_idx].connected == 0
        {
            self.packets_dropped += 1;
            return Err(EngineError::PeerNotConnected(peer));
        }

        let peer_ctx = &mut self.ctx.net.peers[peer_idx];
        let old_seq = i32::from(peer_ctx.seq);
        let stale = packet.seq <= old_seq;
        peer_ctx.ack = peer_ctx.ack.max(packet.ack.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
        if stale {
            if packet.seq < old_seq {
                self.confirmed_regressions += 1;
                let err = EngineError::ConfirmedFrameRegression { peer, old: old_seq, new: packet.seq };
                log::warn!("receive_packet: {err}");
            } else {
                log::debug!("receive_packet: dropping duplicate packet from peer {peer} (seq={})", packet.seq);
            }
            return Ok(());
        }

        let mut by_frame: BTreeMap<i32, Vec<EventKind>> = BTreeMap::new();
        for record in &packet.events {
            by_frame.entry(record.frame).or_default().push(record.kind);
        }

        for (frame_i32, kinds) in by_frame {
            if frame_i32 < 0 {
                continue;
            }
            let frame = frame_i32 as u32;
            let events: Vec<Event> =
                kinds.into_iter().map(|kind| Event { kind, source: peer, origin: Source::Remote }).collect();
            self.ingest_remote_frame(peer, frame, events);
        }

        let peer_ctx = &mut self.ctx.net.peers[peer_idx];
        peer_ctx.seq = peer_ctx.seq.max(packet.seq.clamp(i16::MIN as i32, i16::MAX as i32) as i16);

        // The host serializes step/receive_packet (spec.md §4.G), so any
        // correction to an already-simulated frame is resolved here rather
        // than deferred to the next step.
        self.rollback_if_needed(self.ctx.net.match_frame + 1);

        Ok(())
    }

    /// spec.md §6 `session_emit_inputs`: append already-decoded remote
    /// inputs directly, bypassing the wire codec. Shares ingestion with
    /// `receive_packet` but carries no `seq`/`ack` of its own, so it
    /// cannot participate in stale/regression detection or peer
    /// acknowledgement — only `receive_packet` advances those.
    pub fn session_emit_inputs(&mut self, peer: u8, match_frame: u32, events: &[Event]) -> Result<()> {
        self.require_in_session()?;
        let peer_idx = peer as usize;
        if peer_idx >= MAX_PLAYERS
            || peer_idx >= self.ctx.net.peer_count as usize
            || self.ctx.net.peers[peer_idx].connected == 0
        {
            return Err(EngineError::PeerNotConnected(peer));
        }

        let events: Vec<Event> =
            events.iter().map(|event| Event { kind: event.kind, source: peer, origin: Source::Remote }).collect();
        self.ingest_remote_frame(peer, match_frame, events);
        self.rollback_if_needed(self.ctx.net.match_frame + 1);
        Ok(())
    }

    /// Write `events` into `peer`'s ring slot for `frame` (or buffer them
    /// if `frame` is still ahead of the local simulation), and note the
    /// earliest already-simulated frame a rollback needs to revisit.
    /// Shared by `receive_packet` and `session_emit_inputs` (spec.md §4.E
    /// step 2).
    fn ingest_remote_frame(&mut self, peer: u8, frame: u32, events: Vec<Event>) {
        if self.ctx.net.in_session != 0 && frame > self.ctx.net.match_frame {
            self.future_remote_events.entry(frame).or_default().push((peer, events));
            return;
        }

        let already_simulated = frame <= self.ctx.net.match_frame;
        self.apply_remote_frame(peer, frame, &events);
        if already_simulated {
            self.earliest_new_remote_frame = Some(self.earliest_new_remote_frame.map_or(frame, |f| f.min(frame)));
        }
    }

    /// spec.md §6 `build_outbound_packet`: encode the window of local
    /// events `target_peer` has not yet acknowledged.
    pub fn build_outbound_packet(&self, target_peer: u8) -> Result<Vec<u8>> {
        self.require_in_session()?;
        let peer_idx = target_peer as usize;
        if peer_idx >= MAX_PLAYERS
            || peer_idx >= self.ctx.net.peer_count as usize
            || self.ctx.net.peers[peer_idx].connected == 0
        {
            return Err(EngineError::PeerNotConnected(target_peer));
        }

        let peer_ctx = self.ctx.net.peers[peer_idx];
        let local_seq = self.ctx.net.match_frame as i32;
        let peer_ack = i32::from(peer_ctx.ack);
        let our_ack_of_peer = i32::from(peer_ctx.seq);

        let (packet, deferred) = protocol::build_outbound_packet(
            self.ctx.net.local_peer_id,
            local_seq,
            peer_ack,
            our_ack_of_peer,
            self.config.max_packet_bytes as usize,
            self,
        );
        if let Some(frame) = deferred {
            log::warn!("build_outbound_packet: frame {frame} deferred to peer {target_peer}, over max_packet_bytes");
        }
        Ok(packet.to_bytes())
    }
}

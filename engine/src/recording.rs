// SPDX-License-Identifier: Apache-2.0

//! Tape boundary ops (spec.md §4.D, §6): `start_recording`/`stop_recording`
//! capture a base snapshot plus every event/packet since; `load_tape`
//! restores one and hands the parsed log to `seek` for replay.

use crate::api::Engine;
use crate::error::Result;

impl Engine {
    /// spec.md §6 `start_recording`.
    pub fn start_recording(&mut self, user_data_len: usize, max_events: u32, max_packet_bytes: u32) {
        if self.user_blob.len() != user_data_len {
            self.user_blob.resize(user_data_len, 0);
        }
        let view = tape::SnapshotView {
            time: &self.ctx.time,
            input: &self.ctx.input,
            net: &self.ctx.net,
            ring: &self.ring,
            user_blob: &self.user_blob,
        };
        let start_frame = self.ctx.net.match_frame;
        self.tape = Some(tape::Tape::start_recording(view, start_frame, max_events, max_packet_bytes));
        self.ctx.vcr.is_recording = 1;
        self.ctx.vcr.max_events = max_events;
        self.ctx.vcr.max_packet_bytes = max_packet_bytes;
        log::info!("start_recording: start_frame={start_frame}");
    }

    /// spec.md §6 `stop_recording`. Returns an empty buffer if no
    /// recording was in progress.
    pub fn stop_recording(&mut self) -> Vec<u8> {
        self.ctx.vcr.is_recording = 0;
        match self.tape.take() {
            Some(tape) => tape.stop_recording(),
            None => Vec::new(),
        }
    }

    /// spec.md §6 `load_tape`: restore the embedded base snapshot and keep
    /// the parsed event log around for `seek` to replay forward from it.
    pub fn load_tape(&mut self, bytes: &[u8]) -> Result<()> {
        let loaded = tape::load_tape(
            bytes,
            tape::RestoreTarget {
                time: &mut self.ctx.time,
                input: &mut self.ctx.input,
                net: &mut self.ctx.net,
                ring: &mut self.ring,
                user_blob: &mut self.user_blob,
            },
        )?;

        let start_frame = loaded.header.start_frame;
        self.ctx.net.match_frame = start_frame;
        self.snapshots.clear();
        self.snapshots.insert(start_frame, self.take_snapshot());

        let mut peers: Vec<u8> = loaded.events.iter().map(|record| record.peer).collect();
        peers.sort_unstable();
        peers.dedup();
        self.replay_peers = peers;
        self.loaded_tape = Some(loaded);
        self.ctx.vcr.is_replaying = 1;

        log::info!("load_tape: start_frame={start_frame} frame_count={}", loaded_frame_count(&self.loaded_tape));
        Ok(())
    }

    /// Drives `start_recording`/`stop_recording` from the user-set
    /// `wants_record`/`wants_stop` fields (spec.md §4.A), for hosts that
    /// signal through the shared context rather than calling the boundary
    /// ops directly. Called once per tick, same as `apply_net_intents`.
    pub(crate) fn apply_vcr_intents(&mut self) {
        if self.ctx.vcr.wants_record != 0 {
            self.ctx.vcr.wants_record = 0;
            if self.tape.is_none() {
                let max_events = self.ctx.vcr.max_events;
                let max_packet_bytes = self.ctx.vcr.max_packet_bytes;
                self.start_recording(self.user_blob.len(), max_events, max_packet_bytes);
            }
        }
        if self.ctx.vcr.wants_stop != 0 {
            self.ctx.vcr.wants_stop = 0;
            if self.tape.is_some() {
                self.finished_tape = Some(self.stop_recording());
            }
        }
    }
}

fn loaded_frame_count(loaded: &Option<tape::LoadedTape>) -> u32 {
    loaded.as_ref().map(|t| t.header.frame_count).unwrap_or(0)
}

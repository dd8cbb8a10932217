// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashSet};

use context::{ContextRegion, Event, EventKind, InputRing, Source};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::systems::{NoSystems, SystemTable};

/// The rollback simulation engine (spec.md §6): the single object an
/// embedder links against and drives through `step`/`emit_*`/
/// `receive_packet`/`build_outbound_packet`.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) ctx: ContextRegion,
    pub(crate) ring: InputRing,
    pub(crate) user_blob: Vec<u8>,

    pub(crate) acc_ms: u32,

    pub(crate) pending_local_events: Vec<Event>,
    /// `(peer, frame) -> raw events`, kept so rollback/tape can re-derive a
    /// frame's input from its source events rather than only the final
    /// bits, and so `protocol::EventSource` has something to serve.
    pub(crate) local_event_log: BTreeMap<u32, Vec<Event>>,
    /// Frames whose ring slot for a peer holds a prediction rather than
    /// confirmed data; cleared on overwrite.
    pub(crate) predicted: HashSet<(u8, u32)>,
    /// Earliest match_frame at or before the current frame whose ring
    /// slot was corrected by a packet since the last `step`.
    pub(crate) earliest_new_remote_frame: Option<u32>,
    /// Highest match_frame each peer's ring slot has been filled to
    /// (authoritative or predicted), assuming contiguous fill from 0.
    pub(crate) filled_up_to: [Option<u32>; context::input::MAX_PLAYERS],
    /// Remote events that arrived for a match_frame beyond what has been
    /// simulated yet, applied once `step` reaches that frame instead of
    /// predicting it.
    pub(crate) future_remote_events: BTreeMap<u32, Vec<(u8, Vec<Event>)>>,

    pub(crate) snapshots: BTreeMap<u32, Vec<u8>>,
    pub(crate) tape: Option<tape::Tape>,
    /// Set by `load_tape`; consulted by `seek` to replay recorded input
    /// instead of requiring `emit_*` calls.
    pub(crate) loaded_tape: Option<tape::LoadedTape>,
    /// Distinct peer ids that appear anywhere in `loaded_tape`'s event log.
    pub(crate) replay_peers: Vec<u8>,

    pub(crate) systems: Box<dyn SystemTable>,

    pub(crate) packets_dropped: u64,
    /// Packets whose `seq` regressed below what we already had for that
    /// peer (spec.md §7 error kind 4, `ConfirmedFrameRegression`) — a
    /// protocol bug, distinct from an ordinary stale/duplicate retransmit.
    pub(crate) confirmed_regressions: u64,
    /// Completed tape bytes produced by a `wants_stop`-driven stop rather
    /// than a direct `stop_recording` call; drained by `take_finished_tape`.
    pub(crate) finished_tape: Option<Vec<u8>>,
}

impl Engine {
    /// spec.md §6 `initialize`.
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            ring: InputRing::new(config.ring_len),
            config,
            ctx: ContextRegion::default(),
            user_blob: Vec::new(),
            acc_ms: 0,
            pending_local_events: Vec::new(),
            local_event_log: BTreeMap::new(),
            predicted: HashSet::new(),
            earliest_new_remote_frame: None,
            filled_up_to: [None; context::input::MAX_PLAYERS],
            future_remote_events: BTreeMap::new(),
            snapshots: BTreeMap::new(),
            tape: None,
            loaded_tape: None,
            replay_peers: Vec::new(),
            systems: Box::new(NoSystems),
            packets_dropped: 0,
            confirmed_regressions: 0,
            finished_tape: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &ContextRegion {
        &self.ctx
    }

    pub fn user_blob(&self) -> &[u8] {
        &self.user_blob
    }

    pub fn user_blob_mut(&mut self) -> &mut [u8] {
        &mut self.user_blob
    }

    pub fn packets_dropped(&self) -> u64 {
        self.packets_dropped
    }

    pub fn confirmed_regressions(&self) -> u64 {
        self.confirmed_regressions
    }

    /// Drains the tape produced by a `wants_stop`-driven stop (as opposed
    /// to a direct `stop_recording` call, which already returns its bytes).
    pub fn take_finished_tape(&mut self) -> Option<Vec<u8>> {
        self.finished_tape.take()
    }

    /// spec.md §6 `register_systems`.
    pub fn register_systems(&mut self, systems: Box<dyn SystemTable>) {
        self.systems = systems;
    }

    /// HMR handoff (spec.md §4.G): swap the user system table between
    /// frames, preserving the UserBlob untouched.
    pub fn accept_hmr(&mut self, systems: Box<dyn SystemTable>) {
        self.systems = systems;
    }

    fn emit(&mut self, kind: EventKind, source: u8) {
        let event = Event { kind, source, origin: Source::Local };
        self.pending_local_events.push(event);
    }

    /// spec.md §6 `emit_keydown`.
    pub fn emit_keydown(&mut self, key: u8, source: u8) {
        self.emit(EventKind::KeyDown { key }, source);
    }

    /// spec.md §6 `emit_keyup`.
    pub fn emit_keyup(&mut self, key: u8, source: u8) {
        self.emit(EventKind::KeyUp { key }, source);
    }

    /// spec.md §6 `emit_mousemove`.
    pub fn emit_mousemove(&mut self, x: f32, y: f32, source: u8) {
        self.emit(EventKind::MouseMove { x, y }, source);
    }

    /// spec.md §6 `emit_mousewheel`.
    pub fn emit_mousewheel(&mut self, dx: f32, dy: f32, source: u8) {
        self.emit(EventKind::MouseWheel { dx, dy }, source);
    }

    /// spec.md §6 `emit_mousedown`.
    pub fn emit_mousedown(&mut self, button: u8, source: u8) {
        self.emit(EventKind::MouseDown { button }, source);
    }

    /// spec.md §6 `emit_mouseup`.
    pub fn emit_mouseup(&mut self, button: u8, source: u8) {
        self.emit(EventKind::MouseUp { button }, source);
    }

    /// spec.md §6 `take_snapshot`.
    pub fn take_snapshot(&self) -> Vec<u8> {
        tape::take_snapshot(tape::SnapshotView {
            time: &self.ctx.time,
            input: &self.ctx.input,
            net: &self.ctx.net,
            ring: &self.ring,
            user_blob: &self.user_blob,
        })
    }

    /// spec.md §6 `restore`.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        tape::restore(
            bytes,
            tape::RestoreTarget {
                time: &mut self.ctx.time,
                input: &mut self.ctx.input,
                net: &mut self.ctx.net,
                ring: &mut self.ring,
                user_blob: &mut self.user_blob,
            },
        )
        .map_err(EngineError::from)
    }

    pub(crate) fn snapshot_at_or_before(&self, frame: u32) -> Option<(&u32, &Vec<u8>)> {
        self.snapshots.range(..=frame).next_back()
    }

    pub(crate) fn evict_old_snapshots(&mut self, match_frame: u32) {
        let horizon = match_frame.saturating_sub(self.ring.len() as u32);
        self.snapshots.retain(|&frame, _| frame >= horizon || frame == 0);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

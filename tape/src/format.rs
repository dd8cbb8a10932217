// SPDX-License-Identifier: Apache-2.0

//! Tape binary format (spec.md §3, §4.D): a base snapshot plus an
//! append-only event log and a raw inbound-packet log for post-mortem
//! analysis.
//!
//! Recording and live-session event emission share one sink
//! (`Tape::record_event`), matching spec.md §9's note that tape recording
//! and the live session use the same append path.

use context::Event;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::TapeError;
use crate::snapshot::{self, RestoreTarget, SnapshotView};

pub const TAPE_MAGIC: u32 = 0x5441_5045;
pub const TAPE_VERSION: u16 = 1;

/// One (frame, peer, event) record in the event log: 4 + 1 + 16 = 21 bytes.
const EVENT_RECORD_LEN: usize = 21;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct TapeHeader {
    pub magic: u32,
    pub version: u16,
    /// Total event-log record count, spec.md §9's u16 per-spec choice.
    pub event_count: u16,
    pub start_frame: u32,
    pub frame_count: u32,
    pub max_events: u32,
    pub snapshot_offset: u32,
    pub user_data_offset: u32,
    pub event_start_offset: u32,
    pub event_end_offset: u32,
    pub packet_start_offset: u32,
    pub packet_end_offset: u32,
    pub packet_count: u32,
    pub max_packet_bytes: u32,
}

const _: () = assert!(core::mem::size_of::<TapeHeader>() == 52);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapeEventRecord {
    pub frame: u32,
    pub peer: u8,
    pub event: Event,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TapePacketRecord {
    pub frame: u32,
    pub peer: u8,
    pub bytes: Vec<u8>,
}

/// A tape in active recording, accumulating events and raw packets on top
/// of a base snapshot.
pub struct Tape {
    base_snapshot: Vec<u8>,
    start_frame: u32,
    frame_count: u32,
    max_events: u32,
    max_packet_bytes: u32,
    events: Vec<TapeEventRecord>,
    packets: Vec<TapePacketRecord>,
    recording: bool,
}

impl Tape {
    /// spec.md §4.D `start_recording`.
    pub fn start_recording(view: SnapshotView, start_frame: u32, max_events: u32, max_packet_bytes: u32) -> Self {
        Tape {
            base_snapshot: snapshot::take_snapshot(view),
            start_frame,
            frame_count: 0,
            max_events,
            max_packet_bytes,
            events: Vec::new(),
            packets: Vec::new(),
            recording: true,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Advance the recorded frame count; called once per step while
    /// recording.
    pub fn advance_frame(&mut self) {
        if self.recording {
            self.frame_count += 1;
        }
    }

    /// Append a newly emitted event to the log. Drops and logs a warning
    /// once `max_events` is reached, matching spec.md §7's "drop and
    /// report" policy for bounded external input.
    pub fn record_event(&mut self, frame: u32, peer: u8, event: Event) {
        if !self.recording {
            return;
        }
        if self.events.len() >= self.max_events as usize {
            log::warn!("tape event log full at {} records, dropping event", self.max_events);
            return;
        }
        self.events.push(TapeEventRecord { frame, peer, event });
    }

    /// Append a raw inbound packet to the post-mortem log.
    pub fn record_packet(&mut self, frame: u32, peer: u8, bytes: &[u8]) {
        if !self.recording {
            return;
        }
        if bytes.len() > self.max_packet_bytes as usize {
            log::warn!("dropping oversized packet record ({} bytes)", bytes.len());
            return;
        }
        self.packets.push(TapePacketRecord { frame, peer, bytes: bytes.to_vec() });
    }

    /// spec.md §4.D `stop_recording`: freezes counts and serializes the
    /// final tape bytes.
    pub fn stop_recording(mut self) -> Vec<u8> {
        self.recording = false;

        // Sort by frame, then peer, then arrival order (spec.md §3).
        self.events.sort_by_key(|record| (record.frame, record.peer));

        let header_len = core::mem::size_of::<TapeHeader>() as u32;
        let snapshot_offset = header_len;
        let snapshot_len = self.base_snapshot.len() as u32;

        // Offset of the UserBlob inside the base snapshot, for direct
        // access without re-parsing the snapshot header.
        let user_data_offset = snapshot_offset + snapshot_len - user_blob_len(&self.base_snapshot);

        let event_start_offset = snapshot_offset + snapshot_len;
        let event_end_offset = event_start_offset + self.events.len() as u32 * EVENT_RECORD_LEN as u32;

        let packet_start_offset = event_end_offset;
        let packet_records_len: u32 =
            self.packets.iter().map(|p| (4 + 1 + 2 + p.bytes.len()) as u32).sum();
        let packet_end_offset = packet_start_offset + packet_records_len;

        let header = TapeHeader {
            magic: TAPE_MAGIC,
            version: TAPE_VERSION,
            event_count: self.events.len() as u16,
            start_frame: self.start_frame,
            frame_count: self.frame_count,
            max_events: self.max_events,
            snapshot_offset,
            user_data_offset,
            event_start_offset,
            event_end_offset,
            packet_start_offset,
            packet_end_offset,
            packet_count: self.packets.len() as u32,
            max_packet_bytes: self.max_packet_bytes,
        };

        let mut out = Vec::with_capacity(packet_end_offset as usize);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.base_snapshot);
        for record in &self.events {
            out.extend_from_slice(&record.frame.to_le_bytes());
            out.push(record.peer);
            out.extend_from_slice(&record.event.to_wire());
        }
        for record in &self.packets {
            out.extend_from_slice(&record.frame.to_le_bytes());
            out.push(record.peer);
            out.extend_from_slice(&(record.bytes.len() as u16).to_le_bytes());
            out.extend_from_slice(&record.bytes);
        }
        out
    }
}

fn user_blob_len(snapshot_bytes: &[u8]) -> u32 {
    let header_len = core::mem::size_of::<snapshot::SnapshotHeader>();
    snapshot::SnapshotHeader::read_from_bytes(&snapshot_bytes[..header_len])
        .map(|h| h.user_data_len)
        .unwrap_or(0)
}

/// A parsed, loaded tape ready for frame-by-frame replay.
pub struct LoadedTape {
    pub header: TapeHeader,
    pub events: Vec<TapeEventRecord>,
    pub packets: Vec<TapePacketRecord>,
}

impl LoadedTape {
    /// Events recorded for a given absolute frame, in log order (already
    /// frame/peer/arrival sorted).
    pub fn events_for_frame(&self, frame: u32) -> impl Iterator<Item = &TapeEventRecord> {
        self.events.iter().filter(move |record| record.frame == frame)
    }
}

/// spec.md §4.D `load_tape`: validates magic/version, restores the base
/// snapshot into `target`, and returns the parsed event/packet logs for
/// replay.
pub fn load_tape(bytes: &[u8], target: RestoreTarget) -> Result<LoadedTape, TapeError> {
    let header_len = core::mem::size_of::<TapeHeader>();
    if bytes.len() < header_len {
        return Err(TapeError::TapeTruncated { needed: header_len, have: bytes.len() });
    }
    let header = TapeHeader::read_from_bytes(&bytes[..header_len]).expect("header_len-sized slice always parses");

    if header.magic != TAPE_MAGIC {
        return Err(TapeError::InvalidTapeMagic { expected: TAPE_MAGIC, got: header.magic });
    }
    if header.version != TAPE_VERSION {
        return Err(TapeError::InvalidTapeVersion { expected: TAPE_VERSION, got: header.version });
    }
    if bytes.len() < header.packet_end_offset as usize {
        return Err(TapeError::TapeTruncated {
            needed: header.packet_end_offset as usize,
            have: bytes.len(),
        });
    }

    let snapshot_bytes = &bytes[header.snapshot_offset as usize..header.event_start_offset as usize];
    snapshot::restore(snapshot_bytes, target)?;

    let mut events = Vec::with_capacity(header.event_count as usize);
    let mut pos = header.event_start_offset as usize;
    while pos < header.event_end_offset as usize {
        let frame = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
        let peer = bytes[pos + 4];
        let event_wire = &bytes[pos + 5..pos + 5 + context::event::EVENT_WIRE_SIZE];
        let event = Event::from_wire(event_wire)
            .map_err(|_| TapeError::TapeTruncated { needed: EVENT_RECORD_LEN, have: bytes.len() - pos })?;
        events.push(TapeEventRecord { frame, peer, event });
        pos += EVENT_RECORD_LEN;
    }

    let mut packets = Vec::with_capacity(header.packet_count as usize);
    let mut pos = header.packet_start_offset as usize;
    while pos < header.packet_end_offset as usize {
        let frame = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
        let peer = bytes[pos + 4];
        let len = u16::from_le_bytes(bytes[pos + 5..pos + 7].try_into().unwrap()) as usize;
        let record_bytes = bytes[pos + 7..pos + 7 + len].to_vec();
        packets.push(TapePacketRecord { frame, peer, bytes: record_bytes });
        pos += 7 + len;
    }

    Ok(LoadedTape { header, events, packets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::{EventKind, InputCtx, InputRing, NetCtx, Source, TimeCtx};

    fn empty_view<'a>(time: &'a TimeCtx, input: &'a InputCtx, net: &'a NetCtx, ring: &'a InputRing) -> SnapshotView<'a> {
        SnapshotView { time, input, net, ring, user_blob: &[] }
    }

    #[test]
    fn records_and_loads_events_in_frame_order() {
        let time = TimeCtx::default();
        let input = InputCtx::default();
        let net = NetCtx::default();
        let ring = InputRing::new(128);

        let mut tape = Tape::start_recording(empty_view(&time, &input, &net, &ring), 0, 64, 4096);
        tape.record_event(1, 0, Event { kind: EventKind::KeyDown { key: 41 }, source: 0, origin: Source::Local });
        tape.record_event(0, 0, Event { kind: EventKind::KeyUp { key: 41 }, source: 0, origin: Source::Local });
        tape.advance_frame();
        tape.advance_frame();

        let bytes = tape.stop_recording();

        let mut time2 = TimeCtx::default();
        let mut input2 = InputCtx::default();
        let mut net2 = NetCtx::default();
        let mut ring2 = InputRing::new(128);
        let mut user_blob2: Vec<u8> = vec![];

        let loaded = load_tape(
            &bytes,
            RestoreTarget {
                time: &mut time2,
                input: &mut input2,
                net: &mut net2,
                ring: &mut ring2,
                user_blob: &mut user_blob2,
            },
        )
        .unwrap();

        assert_eq!(loaded.header.magic, TAPE_MAGIC);
        assert_eq!(loaded.header.frame_count, 2);
        assert_eq!(loaded.events.len(), 2);
        // Sorted by frame then peer: frame 0 before frame 1.
        assert_eq!(loaded.events[0].frame, 0);
        assert_eq!(loaded.events[1].frame, 1);
        assert_eq!(loaded.events_for_frame(1).count(), 1);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = vec![0u8; core::mem::size_of::<TapeHeader>()];
        bytes[0..4].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let mut time2 = TimeCtx::default();
        let mut input2 = InputCtx::default();
        let mut net2 = NetCtx::default();
        let mut ring2 = InputRing::new(128);
        let mut user_blob2: Vec<u8> = vec![];

        let err = load_tape(
            &bytes,
            RestoreTarget {
                time: &mut time2,
                input: &mut input2,
                net: &mut net2,
                ring: &mut ring2,
                user_blob: &mut user_blob2,
            },
        )
        .unwrap_err();
        assert_eq!(err, TapeError::InvalidTapeMagic { expected: TAPE_MAGIC, got: 0xDEAD_BEEF });
    }

    #[test]
    fn drops_events_past_max_events() {
        let time = TimeCtx::default();
        let input = InputCtx::default();
        let net = NetCtx::default();
        let ring = InputRing::new(128);

        let mut tape = Tape::start_recording(empty_view(&time, &input, &net, &ring), 0, 1, 4096);
        tape.record_event(0, 0, Event { kind: EventKind::KeyDown { key: 1 }, source: 0, origin: Source::Local });
        tape.record_event(1, 0, Event { kind: EventKind::KeyDown { key: 2 }, source: 0, origin: Source::Local });
        assert_eq!(tape.events.len(), 1);
    }
}

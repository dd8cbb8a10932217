// SPDX-License-Identifier: Apache-2.0

use context::event::{Event, EventKind};

use crate::error::ProtocolError;

pub const PACKET_VERSION: u8 = 1;

/// Fixed header: version(1) + local_peer_id(1) + seq(4) + ack(4) + event_count(2).
const HEADER_LEN: usize = 1 + 1 + 4 + 4 + 2;

fn payload_len(tag: u8) -> Option<usize> {
    match tag {
        0 | 1 | 4 | 5 => Some(1), // KeyDown/KeyUp/MouseDown/MouseUp: one u8
        2 | 3 => Some(8),         // MouseMove/MouseWheel: two f32
        _ => None,
    }
}

fn kind_tag(kind: &EventKind) -> u8 {
    match kind {
        EventKind::KeyDown { .. } => 0,
        EventKind::KeyUp { .. } => 1,
        EventKind::MouseMove { .. } => 2,
        EventKind::MouseWheel { .. } => 3,
        EventKind::MouseDown { .. } => 4,
        EventKind::MouseUp { .. } => 5,
    }
}

fn encode_payload(kind: &EventKind, out: &mut Vec<u8>) {
    match *kind {
        EventKind::KeyDown { key } | EventKind::KeyUp { key } => out.push(key),
        EventKind::MouseDown { button } | EventKind::MouseUp { button } => out.push(button),
        EventKind::MouseMove { x, y } => {
            out.extend_from_slice(&x.to_le_bytes());
            out.extend_from_slice(&y.to_le_bytes());
        }
        EventKind::MouseWheel { dx, dy } => {
            out.extend_from_slice(&dx.to_le_bytes());
            out.extend_from_slice(&dy.to_le_bytes());
        }
    }
}

fn decode_payload(tag: u8, buf: &[u8]) -> Result<EventKind, ProtocolError> {
    Ok(match tag {
        0 => EventKind::KeyDown { key: buf[0] },
        1 => EventKind::KeyUp { key: buf[0] },
        2 => EventKind::MouseMove {
            x: f32::from_le_bytes(buf[0..4].try_into().unwrap()),
            y: f32::from_le_bytes(buf[4..8].try_into().unwrap()),
        },
        3 => EventKind::MouseWheel {
            dx: f32::from_le_bytes(buf[0..4].try_into().unwrap()),
            dy: f32::from_le_bytes(buf[4..8].try_into().unwrap()),
        },
        4 => EventKind::MouseDown { button: buf[0] },
        5 => EventKind::MouseUp { button: buf[0] },
        other => return Err(ProtocolError::InvalidEventKind(other)),
    })
}

/// One event entry in a packet: an absolute MatchFrame, the originating
/// peer (always `local_peer_id` for outbound packets), and the event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventRecord {
    pub frame: i32,
    pub peer: u8,
    pub kind: EventKind,
}

impl EventRecord {
    fn wire_len(&self) -> usize {
        4 + 1 + 1 + payload_len(kind_tag(&self.kind)).unwrap_or(0)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.frame.to_le_bytes());
        out.push(self.peer);
        out.push(kind_tag(&self.kind));
        encode_payload(&self.kind, out);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutboundPacket {
    pub version: u8,
    pub local_peer_id: u8,
    /// Our current match_frame.
    pub seq: i32,
    /// Highest contiguous match_frame we have received from the target peer.
    pub ack: i32,
    pub events: Vec<EventRecord>,
}

impl OutboundPacket {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.events.len() * 10);
        out.push(self.version);
        out.push(self.local_peer_id);
        out.extend_from_slice(&self.seq.to_le_bytes());
        out.extend_from_slice(&self.ack.to_le_bytes());
        out.extend_from_slice(&(self.events.len() as u16).to_le_bytes());
        for event in &self.events {
            event.encode(&mut out);
        }
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < HEADER_LEN {
            return Err(ProtocolError::Truncated(buf.len()));
        }
        let version = buf[0];
        if version != PACKET_VERSION {
            return Err(ProtocolError::InvalidVersion { got: version, expected: PACKET_VERSION });
        }
        let local_peer_id = buf[1];
        let seq = i32::from_le_bytes(buf[2..6].try_into().unwrap());
        let ack = i32::from_le_bytes(buf[6..10].try_into().unwrap());
        let event_count = u16::from_le_bytes(buf[10..12].try_into().unwrap());

        let mut events = Vec::with_capacity(event_count as usize);
        let mut pos = HEADER_LEN;
        for _ in 0..event_count {
            if pos + 6 > buf.len() {
                return Err(ProtocolError::EventsOverflow {
                    declared: event_count,
                    available: buf.len().saturating_sub(pos),
                });
            }
            let frame = i32::from_le_bytes(buf[pos..pos + 4].try_into().unwrap());
            let peer = buf[pos + 4];
            let tag = buf[pos + 5];
            let plen = payload_len(tag).ok_or(ProtocolError::InvalidEventKind(tag))?;
            if pos + 6 + plen > buf.len() {
                return Err(ProtocolError::EventsOverflow {
                    declared: event_count,
                    available: buf.len().saturating_sub(pos),
                });
            }
            let kind = decode_payload(tag, &buf[pos + 6..pos + 6 + plen])?;
            events.push(EventRecord { frame, peer, kind });
            pos += 6 + plen;
        }

        Ok(OutboundPacket { version, local_peer_id, seq, ack, events })
    }
}

/// Supplies a local peer's raw emitted events for a given MatchFrame, in
/// the stable (arrival) order they were recorded.
pub trait EventSource {
    fn events_for_frame(&self, frame: u32) -> &[Event];
}

/// Build the outbound packet to `target_peer` (spec.md §4.F).
///
/// The window spans `(peer_ack, local_seq]` — every frame the remote has
/// not yet acknowledged. If the window would exceed `max_packet_bytes`,
/// it is truncated oldest-first; the return value's second element is the
/// first MatchFrame that had to be deferred to a future packet, if any.
pub fn build_outbound_packet(
    local_peer_id: u8,
    local_seq: i32,
    peer_ack: i32,
    our_ack_of_peer: i32,
    max_packet_bytes: usize,
    source: &impl EventSource,
) -> (OutboundPacket, Option<i32>) {
    let mut packet = OutboundPacket {
        version: PACKET_VERSION,
        local_peer_id,
        seq: local_seq,
        ack: our_ack_of_peer,
        events: Vec::new(),
    };

    let mut size = HEADER_LEN;
    let mut deferred = None;

    if peer_ack < local_seq {
        let start = peer_ack.saturating_add(1);
        for frame in start..=local_seq {
            let frame_u32 = frame.max(0) as u32;
            for event in source.events_for_frame(frame_u32) {
                let record = EventRecord { frame, peer: local_peer_id, kind: event.kind };
                let record_len = record.wire_len();
                if size + record_len > max_packet_bytes {
                    deferred.get_or_insert(frame);
                    break;
                }
                size += record_len;
                packet.events.push(record);
            }
            if deferred.is_some() {
                break;
            }
        }
    }

    (packet, deferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::event::Source as EventOrigin;

    struct FakeSource {
        by_frame: std::collections::HashMap<u32, Vec<Event>>,
    }

    impl EventSource for FakeSource {
        fn events_for_frame(&self, frame: u32) -> &[Event] {
            self.by_frame.get(&frame).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    fn mouse_move(x: f32, y: f32) -> Event {
        Event { kind: EventKind::MouseMove { x, y }, source: 0, origin: EventOrigin::Local }
    }

    #[test]
    fn packet_round_trips() {
        let packet = OutboundPacket {
            version: PACKET_VERSION,
            local_peer_id: 1,
            seq: 9,
            ack: 4,
            events: vec![
                EventRecord { frame: 5, peer: 1, kind: EventKind::KeyDown { key: 41 } },
                EventRecord { frame: 7, peer: 1, kind: EventKind::MouseMove { x: 1.0, y: 2.0 } },
            ],
        };
        let bytes = packet.to_bytes();
        let decoded = OutboundPacket::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = OutboundPacket {
            version: PACKET_VERSION,
            local_peer_id: 0,
            seq: 0,
            ack: -1,
            events: vec![],
        }
        .to_bytes();
        bytes[0] = 7;
        assert_eq!(
            OutboundPacket::from_bytes(&bytes),
            Err(ProtocolError::InvalidVersion { got: 7, expected: PACKET_VERSION })
        );
    }

    #[test]
    fn windowing_covers_ack_exclusive_to_seq_inclusive() {
        let mut by_frame = std::collections::HashMap::new();
        for frame in 5..=9u32 {
            by_frame.insert(frame, vec![mouse_move(frame as f32, 0.0)]);
        }
        let source = FakeSource { by_frame };

        let (packet, deferred) = build_outbound_packet(0, 9, 4, -1, 1 << 20, &source);
        assert!(deferred.is_none());
        let frames: Vec<i32> = packet.events.iter().map(|e| e.frame).collect();
        assert_eq!(frames, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn truncates_oldest_first_when_over_budget() {
        let mut by_frame = std::collections::HashMap::new();
        for frame in 5..=9u32 {
            by_frame.insert(frame, vec![mouse_move(frame as f32, 0.0)]);
        }
        let source = FakeSource { by_frame };

        // Header (12) + exactly 2 mouse-move records (13 bytes each: 4+1+1+8=14... compute).
        let record_len = 4 + 1 + 1 + 8; // 14
        let budget = HEADER_LEN + record_len * 2;
        let (packet, deferred) = build_outbound_packet(0, 9, 4, -1, budget, &source);
        assert_eq!(packet.events.len(), 2);
        assert_eq!(deferred, Some(7));
    }
}

// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use context::event::{Event, EventKind, Source};
use protocol::{build_outbound_packet, EventSource, OutboundPacket};

struct Log {
    by_frame: HashMap<u32, Vec<Event>>,
}

impl EventSource for Log {
    fn events_for_frame(&self, frame: u32) -> &[Event] {
        self.by_frame.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn keydown(key: u8) -> Event {
    Event { kind: EventKind::KeyDown { key }, source: 0, origin: Source::Local }
}

/// spec.md §8 scenario 5: ack=4, seq=9 -> packet carries frames 5..=9.
#[test]
fn scenario_packet_window_ack_to_seq() {
    let mut by_frame = HashMap::new();
    by_frame.insert(6, vec![keydown(41)]);
    by_frame.insert(9, vec![keydown(42)]);
    let log = Log { by_frame };

    let (packet, deferred) = build_outbound_packet(0, 9, 4, -1, 1 << 16, &log);
    assert!(deferred.is_none());
    assert_eq!(packet.seq, 9);
    let frames: Vec<i32> = packet.events.iter().map(|e| e.frame).collect();
    assert_eq!(frames, vec![6, 9]);

    let bytes = packet.to_bytes();
    let decoded = OutboundPacket::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn fully_acknowledged_peer_gets_an_empty_packet() {
    let log = Log { by_frame: HashMap::new() };
    let (packet, deferred) = build_outbound_packet(0, 9, 9, -1, 1 << 16, &log);
    assert!(packet.events.is_empty());
    assert!(deferred.is_none());
}

#[test]
fn decode_rejects_truncated_header() {
    let err = OutboundPacket::from_bytes(&[1, 2, 3]).unwrap_err();
    assert_eq!(err, protocol::ProtocolError::Truncated(3));
}

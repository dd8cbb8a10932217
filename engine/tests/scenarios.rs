// SPDX-License-Identifier: Apache-2.0

use context::EventKind;
use engine::{Engine, EngineConfig, SystemTable, UserSystemCtx};
use protocol::{EventRecord, OutboundPacket, PACKET_VERSION};

/// Counts, into the first 4 bytes of the UserBlob, how many of the first
/// two players are holding key 1 this frame. Deterministic and sensitive
/// to rollback correctness: a late correction to an earlier frame changes
/// every later frame's count if it changes held state.
struct HeldKeyCounter;

impl SystemTable for HeldKeyCounter {
    fn invoke(&mut self, _system_id: u32, ctx: &mut UserSystemCtx) {
        let mut total = u32::from_le_bytes(ctx.user_blob[0..4].try_into().unwrap());
        for player in ctx.input.players.iter().take(2) {
            if player.keys[1].down() {
                total = total.wrapping_add(1);
            }
        }
        ctx.user_blob[0..4].copy_from_slice(&total.to_le_bytes());
    }

    fn system_count(&self) -> u32 {
        1
    }
}

#[test]
fn basic_step_advances_time_and_match_frame() {
    let mut engine = Engine::new(EngineConfig::new());
    engine.step(16).unwrap();
    assert_eq!(engine.context().time.frame, 1);
    assert_eq!(engine.context().time.total_ms, 16);
}

#[test]
fn local_keydown_then_keyup_round_trips_through_the_ring() {
    let mut engine = Engine::new(EngineConfig::new());

    engine.emit_keydown(41, 0);
    engine.step(16).unwrap();
    assert!(engine.context().input.players[0].keys[41].down());

    engine.emit_keyup(41, 0);
    engine.step(16).unwrap();
    assert!(engine.context().input.players[0].keys[41].up());
    assert!(!engine.context().input.players[0].keys[41].down());

    engine.step(16).unwrap();
    assert!(!engine.context().input.players[0].keys[41].up());
    assert!(!engine.context().input.players[0].keys[41].held());
}

#[test]
fn snapshot_restore_is_idempotent() {
    let mut engine = Engine::new(EngineConfig::new());
    engine.emit_mousemove(3.0, 4.0, 0);
    engine.step(16).unwrap();

    let bytes = engine.take_snapshot();
    let before = engine.context().input.players[0];
    engine.restore(&bytes).unwrap();
    assert_eq!(engine.context().input.players[0], before);
    assert_eq!(engine.take_snapshot(), bytes);
}

#[test]
fn rollback_resimulates_exactly_the_corrected_window() {
    let mut engine = Engine::new(EngineConfig::wide_window());
    engine.register_systems(Box::new(HeldKeyCounter));
    engine.session_init(2, 4);

    for _ in 0..10 {
        engine.step(16).unwrap();
    }
    assert_eq!(engine.context().net.match_frame, 9);
    assert_eq!(engine.context().net.total_rollbacks, 0);

    // Corrects peer 1's input at match_frame 2 (raw frame 3): key 1 goes
    // down there and, since HELD persists through prediction, for every
    // frame after.
    let packet = OutboundPacket {
        version: PACKET_VERSION,
        local_peer_id: 1,
        seq: 2,
        ack: -1,
        events: vec![EventRecord { frame: 2, peer: 1, kind: EventKind::KeyDown { key: 1 } }],
    };
    engine.receive_packet(1, &packet.to_bytes()).unwrap();

    assert_eq!(engine.context().net.last_rollback_depth, 8);
    assert_eq!(engine.context().net.total_rollbacks, 1);
    assert_eq!(engine.context().net.frames_resimulated, 8);

    // Frames 2..9 now all see peer 1 holding key 1: 8 extra counts.
    let counter = u32::from_le_bytes(engine.user_blob()[0..4].try_into().unwrap());
    assert_eq!(counter, 8);
}

#[test]
fn build_outbound_packet_windows_from_peer_ack_to_local_seq() {
    let mut engine = Engine::new(EngineConfig::new());
    engine.session_init(2, 0);

    for frame in 0..10u32 {
        if (5..=9).contains(&frame) {
            engine.emit_mousemove(frame as f32, 0.0, 0);
        }
        engine.step(16).unwrap();
    }
    assert_eq!(engine.context().net.match_frame, 9);

    // Peer 1 has acked up through match_frame 4; our outbound packet to
    // them should carry exactly frames 5..=9.
    let ack_packet = OutboundPacket {
        version: PACKET_VERSION,
        local_peer_id: 1,
        seq: 0,
        ack: 4,
        events: vec![],
    };
    engine.receive_packet(1, &ack_packet.to_bytes()).unwrap();

    let bytes = engine.build_outbound_packet(1).unwrap();
    let decoded = OutboundPacket::from_bytes(&bytes).unwrap();
    let frames: Vec<i32> = decoded.events.iter().map(|e| e.frame).collect();
    assert_eq!(frames, vec![5, 6, 7, 8, 9]);
}

#[test]
fn receive_packet_rejects_unknown_peer() {
    let mut engine = Engine::new(EngineConfig::new());
    engine.session_init(1, 0);
    let packet = OutboundPacket { version: PACKET_VERSION, local_peer_id: 1, seq: 0, ack: -1, events: vec![] };
    assert!(engine.receive_packet(1, &packet.to_bytes()).is_err());
    assert_eq!(engine.packets_dropped(), 1);
}

/// Records 120 frames of a deterministic mouse-move animation with no
/// session active, stops, loads the tape into a fresh engine, and seeks
/// to frame 60: the replayed context must match the original run exactly,
/// proving tape replay doesn't depend on `peer_count`/`connected`.
#[test]
fn tape_recorded_without_a_session_replays_exactly_via_seek() {
    let config = EngineConfig::new();
    let mut engine = Engine::new(config);
    engine.start_recording(0, config.max_events, config.max_packet_bytes);

    let mut frame_60_snapshot = None;
    for frame in 0..120u32 {
        engine.emit_mousemove(frame as f32, (frame * 2) as f32, 0);
        engine.step(16).unwrap();
        if engine.context().time.frame == 60 {
            frame_60_snapshot = Some(engine.take_snapshot());
        }
    }
    let frame_60_snapshot = frame_60_snapshot.expect("loop passes through frame 60");
    assert_eq!(engine.context().input.players[0].mouse.x, 59.0);

    let tape_bytes = engine.stop_recording();

    let mut replay = Engine::new(config);
    replay.load_tape(&tape_bytes).unwrap();
    replay.seek(60).unwrap();

    assert_eq!(replay.context().time.frame, 60);
    assert_eq!(replay.context().input.players[0].mouse.x, 59.0);
    assert_eq!(replay.context().input.players[0].mouse.y, 118.0);
    assert_eq!(replay.take_snapshot(), frame_60_snapshot);
}

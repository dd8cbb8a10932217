// SPDX-License-Identifier: Apache-2.0

use context::{Event, EventKind, InputCtx, InputRing, NetCtx, Source, TimeCtx};
use tape::{load_tape, RestoreTarget, SnapshotView, Tape};

/// spec.md §8 scenario 6, restricted to this crate's surface: record a
/// short deterministic run, stop, and load it back into a fresh set of
/// context blocks.
#[test]
fn record_stop_load_round_trips_base_state() {
    let mut time = TimeCtx::default();
    let input = InputCtx::default();
    let net = NetCtx::default();
    let ring = InputRing::new(128);

    time.tick(16);
    time.tick(16);

    let mut tape =
        Tape::start_recording(SnapshotView { time: &time, input: &input, net: &net, ring: &ring, user_blob: &[] }, 0, 256, 4096);

    for frame in 0..5u32 {
        tape.record_event(
            frame,
            0,
            Event { kind: EventKind::MouseMove { x: frame as f32, y: 0.0 }, source: 0, origin: Source::Local },
        );
        tape.advance_frame();
    }

    let bytes = tape.stop_recording();

    let mut time2 = TimeCtx::default();
    let mut input2 = InputCtx::default();
    let mut net2 = NetCtx::default();
    let mut ring2 = InputRing::new(128);
    let mut user_blob2: Vec<u8> = vec![];

    let loaded = load_tape(
        &bytes,
        RestoreTarget { time: &mut time2, input: &mut input2, net: &mut net2, ring: &mut ring2, user_blob: &mut user_blob2 },
    )
    .unwrap();

    assert_eq!(time2, time);
    assert_eq!(loaded.header.frame_count, 5);
    assert_eq!(loaded.events.len(), 5);
    for (frame, record) in loaded.events.iter().enumerate() {
        assert_eq!(record.frame, frame as u32);
        assert_eq!(record.event.kind, EventKind::MouseMove { x: frame as f32, y: 0.0 });
    }
}

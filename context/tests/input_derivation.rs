// SPDX-License-Identifier: Apache-2.0

use context::event::{Event, EventKind, Source};
use context::input::PlayerInput;

#[test]
fn scenario_keydown_then_keyup_then_idle() {
    let mut input = PlayerInput::default();

    input.begin_frame();
    input.apply_event(&Event { kind: EventKind::KeyDown { key: 41 }, source: 0, origin: Source::Local });
    assert_eq!((input.keys[41].held(), input.keys[41].up()), (true, false));

    input.begin_frame();
    input.apply_event(&Event { kind: EventKind::KeyUp { key: 41 }, source: 0, origin: Source::Local });
    assert_eq!((input.keys[41].held(), input.keys[41].up()), (false, true));

    input.begin_frame();
    assert_eq!((input.keys[41].held(), input.keys[41].up()), (false, false));
}

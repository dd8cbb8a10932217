// SPDX-License-Identifier: Apache-2.0

//! `InputCtx`: derived per-peer, per-frame input state (spec.md §3, §4.B).
//!
//! Each key and mouse button is one byte holding two bits: `HELD` (bit 0)
//! and `UP` (bit 1, "went up this frame"). `down = held && !up`. `UP` is
//! transient and is cleared at the start of the next step, along with the
//! wheel deltas; `HELD` persists across frames until a matching release.

use bitflags::bitflags;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::event::{Event, EventKind};

pub const MAX_PLAYERS: usize = 12;

bitflags! {
    /// Per-key / per-button bit encoding shared by keyboard and mouse
    /// button state.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
    pub struct KeyBits: u8 {
        const HELD = 0b01;
        const UP   = 0b10;
    }
}

impl KeyBits {
    pub fn down(self) -> bool {
        self.contains(KeyBits::HELD) && !self.contains(KeyBits::UP)
    }

    pub fn held(self) -> bool {
        self.contains(KeyBits::HELD)
    }

    pub fn up(self) -> bool {
        self.contains(KeyBits::UP)
    }

    fn press(&mut self) {
        self.insert(KeyBits::HELD);
        self.remove(KeyBits::UP);
    }

    fn release(&mut self) {
        self.remove(KeyBits::HELD);
        self.insert(KeyBits::UP);
    }

    /// Clear the transient `UP` bit; called at the start of a step before
    /// this frame's events are applied.
    fn clear_transient(&mut self) {
        self.remove(KeyBits::UP);
    }
}

pub type KeyRegion = [KeyBits; 256];

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct MouseRegion {
    pub x: f32,
    pub y: f32,
    pub wheel_x: f32,
    pub wheel_y: f32,
    pub left: KeyBits,
    pub middle: KeyBits,
    pub right: KeyBits,
    _reserved: [u8; 5],
}

const _: () = assert!(core::mem::size_of::<MouseRegion>() == 24);
const _: () = assert!(core::mem::align_of::<MouseRegion>() == 4);

impl MouseRegion {
    fn button_mut(&mut self, button: u8) -> Option<&mut KeyBits> {
        match button {
            0 => Some(&mut self.left),
            1 => Some(&mut self.middle),
            2 => Some(&mut self.right),
            _ => None,
        }
    }

    fn clear_transient(&mut self) {
        self.left.clear_transient();
        self.middle.clear_transient();
        self.right.clear_transient();
        self.wheel_x = 0.0;
        self.wheel_y = 0.0;
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PlayerInput {
    pub keys: KeyRegion,
    pub mouse: MouseRegion,
}

const _: () = assert!(core::mem::size_of::<PlayerInput>() == 280);

impl PlayerInput {
    /// Clear transient bits ahead of applying this frame's events: the
    /// `(previous ∧ clear-transient-bits)` half of spec.md §4.B's
    /// derivation rule.
    pub fn begin_frame(&mut self) {
        for key in &mut self.keys {
            key.clear_transient();
        }
        self.mouse.clear_transient();
    }

    /// Apply one event onto this frame's slot, in arrival/wire order.
    pub fn apply_event(&mut self, event: &Event) {
        match event.kind {
            EventKind::KeyDown { key } => self.keys[key as usize].press(),
            EventKind::KeyUp { key } => self.keys[key as usize].release(),
            EventKind::MouseMove { x, y } => {
                self.mouse.x = x;
                self.mouse.y = y;
            }
            EventKind::MouseWheel { dx, dy } => {
                self.mouse.wheel_x += dx;
                self.mouse.wheel_y += dy;
            }
            EventKind::MouseDown { button } => {
                if let Some(bits) = self.mouse.button_mut(button) {
                    bits.press();
                }
            }
            EventKind::MouseUp { button } => {
                if let Some(bits) = self.mouse.button_mut(button) {
                    bits.release();
                }
            }
        }
    }

    /// Predict this peer's next-frame input by copying the current frame
    /// forward, with `UP` cleared (spec.md §4.E Prediction): bits 0 and
    /// (per-button) held state are preserved, transient `up` is not.
    pub fn predict_next(&self) -> Self {
        let mut next = *self;
        next.begin_frame();
        next
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct InputCtx {
    pub players: [PlayerInput; MAX_PLAYERS],
}

const _: () = assert!(core::mem::size_of::<InputCtx>() == 3360);

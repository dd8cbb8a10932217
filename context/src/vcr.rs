// SPDX-License-Identifier: Apache-2.0

//! `VcrCtx`: recording/replay state shared between the engine and the
//! `tape` crate. User code may only set `wants_record`/`wants_stop`; the
//! engine owns every other field.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct VcrCtx {
    pub is_recording: u8,
    pub is_replaying: u8,
    pub wants_record: u8,
    pub wants_stop: u8,
    pub max_events: u32,
    pub max_packet_bytes: u32,
}

const _: () = assert!(core::mem::size_of::<VcrCtx>() == 12);

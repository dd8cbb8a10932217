// SPDX-License-Identifier: Apache-2.0

//! `ScreenCtx`: logical and physical viewport dimensions. Read-only from
//! the simulation's perspective; the host writes it between steps.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ScreenCtx {
    pub width: u32,
    pub height: u32,
    pub physical_width: u32,
    pub physical_height: u32,
    pub pixel_ratio: f32,
}

const _: () = assert!(core::mem::size_of::<ScreenCtx>() == 20);

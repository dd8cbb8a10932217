// SPDX-License-Identifier: Apache-2.0

//! `TimeCtx`: the engine's monotonic frame and wall-clock counters.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Fixed-layout time block. 24 bytes, 8-byte aligned so `total_ms` never
/// straddles a word boundary once laid out in a snapshot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct TimeCtx {
    /// Monotonic frame counter since engine boot.
    pub frame: u32,
    /// Fixed step duration in milliseconds.
    pub dt_ms: u32,
    /// Total simulated milliseconds since boot.
    pub total_ms: u64,
    /// Reserved for future ABI growth; always zero.
    pub reserved: [u8; 8],
}

const _: () = assert!(core::mem::size_of::<TimeCtx>() == 24);
const _: () = assert!(core::mem::align_of::<TimeCtx>() == 8);

impl TimeCtx {
    /// Advance by one fixed step.
    pub fn tick(&mut self, dt_ms: u32) {
        self.frame += 1;
        self.dt_ms = dt_ms;
        self.total_ms += u64::from(dt_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_frame_and_total() {
        let mut t = TimeCtx::default();
        t.tick(16);
        assert_eq!(t.frame, 1);
        assert_eq!(t.dt_ms, 16);
        assert_eq!(t.total_ms, 16);
        t.tick(16);
        assert_eq!(t.frame, 2);
        assert_eq!(t.total_ms, 32);
    }
}

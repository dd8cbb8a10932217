// SPDX-License-Identifier: Apache-2.0

//! `ContextRegion`: the six fixed-layout blocks treated as a single
//! contiguous byte region for snapshot/tape purposes (spec.md §4.A).
//!
//! Unlike the teacher's `SharedMemory` (a raw pointer over an mmap'd
//! region), each block here is an owned, typed field — the native
//! equivalent of the "typed view over a fixed byte region" called out in
//! spec.md §9. `encode`/`decode` are what serializes that view into the
//! contiguous layout snapshots and tapes actually need on the wire.

use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::input::InputCtx;
use crate::net::NetCtx;
use crate::rand::RandCtx;
use crate::screen::ScreenCtx;
use crate::time::TimeCtx;
use crate::vcr::VcrCtx;

/// Byte offsets of each block within the encoded region, computed from
/// the blocks' own sizes rather than hardcoded.
pub struct OffsetTable {
    pub time: usize,
    pub input: usize,
    pub net: usize,
    pub rand: usize,
    pub screen: usize,
    pub vcr: usize,
    pub total_len: usize,
}

pub const OFFSETS: OffsetTable = {
    let time = 0;
    let input = time + core::mem::size_of::<TimeCtx>();
    let net = input + core::mem::size_of::<InputCtx>();
    let rand = net + core::mem::size_of::<NetCtx>();
    let screen = rand + core::mem::size_of::<RandCtx>();
    let vcr = screen + core::mem::size_of::<ScreenCtx>();
    let total_len = vcr + core::mem::size_of::<VcrCtx>();
    OffsetTable { time, input, net, rand, screen, vcr, total_len }
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextRegion {
    pub time: TimeCtx,
    pub input: InputCtx,
    pub net: NetCtx,
    pub rand: RandCtx,
    pub screen: ScreenCtx,
    pub vcr: VcrCtx,
}

impl ContextRegion {
    pub fn encoded_len() -> usize {
        OFFSETS.total_len
    }

    /// Copy every block verbatim into `out`, little-endian (all fields
    /// are byte arrays or already little-endian-native integers/floats
    /// on every platform this engine targets).
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.time.as_bytes());
        out.extend_from_slice(self.input.as_bytes());
        out.extend_from_slice(self.net.as_bytes());
        out.extend_from_slice(self.rand.as_bytes());
        out.extend_from_slice(self.screen.as_bytes());
        out.extend_from_slice(self.vcr.as_bytes());
    }

    /// Overwrite every block from `bytes` in place; does not allocate.
    /// `bytes` must be at least [`ContextRegion::encoded_len`] long.
    pub fn decode(&mut self, bytes: &[u8]) -> Option<()> {
        if bytes.len() < Self::encoded_len() {
            return None;
        }
        self.time = TimeCtx::read_from_bytes(&bytes[OFFSETS.time..OFFSETS.input]).ok()?;
        self.input = InputCtx::read_from_bytes(&bytes[OFFSETS.input..OFFSETS.net]).ok()?;
        self.net = NetCtx::read_from_bytes(&bytes[OFFSETS.net..OFFSETS.rand]).ok()?;
        self.rand = RandCtx::read_from_bytes(&bytes[OFFSETS.rand..OFFSETS.screen]).ok()?;
        self.screen = ScreenCtx::read_from_bytes(&bytes[OFFSETS.screen..OFFSETS.vcr]).ok()?;
        self.vcr = VcrCtx::read_from_bytes(&bytes[OFFSETS.vcr..OFFSETS.total_len]).ok()?;
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trips() {
        let mut region = ContextRegion::default();
        region.time.frame = 42;
        region.net.peer_count = 2;
        region.rand.seed = 0xDEAD_BEEF;

        let mut bytes = Vec::new();
        region.encode(&mut bytes);
        assert_eq!(bytes.len(), ContextRegion::encoded_len());

        let mut restored = ContextRegion::default();
        restored.decode(&bytes).unwrap();
        assert_eq!(restored, region);
    }

    #[test]
    fn decode_rejects_truncated_input() {
        let mut region = ContextRegion::default();
        assert!(region.decode(&[0u8; 4]).is_none());
    }
}

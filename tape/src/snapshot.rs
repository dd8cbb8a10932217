// SPDX-License-Identifier: Apache-2.0

//! Snapshot encode/decode (spec.md §3, §4.C).
//!
//! A snapshot is `SnapshotHeader` followed by `TimeCtx`, `InputCtx`,
//! `NetCtx`, the linearized input ring, and the opaque UserBlob. All
//! blocks are copied verbatim; restore never allocates into the context
//! blocks or UserBlob, only into scratch buffers used to validate shape.

use context::{InputCtx, InputRing, NetCtx, PlayerInput, TimeCtx, MAX_PLAYERS};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::TapeError;

pub const SNAPSHOT_VERSION: u32 = 1;

/// 40-byte self-describing header, 8-byte aligned so the context blocks
/// that follow (all multiples of 8 in size) stay naturally aligned.
///
/// `events_len` and `input_buffer_len` both describe the linearized ring
/// region's byte length; the distilled spec lists them as separate fields
/// without distinguishing them; `restore` requires them equal and treats
/// any mismatch as truncation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct SnapshotHeader {
    pub version: u32,
    pub user_data_len: u32,
    pub engine_data_len: u32,
    pub snapshot_len: u32,
    pub time_len: u32,
    pub input_len: u32,
    pub net_len: u32,
    pub events_len: u32,
    pub input_buffer_len: u32,
    pub reserved: u32,
}

const _: () = assert!(core::mem::size_of::<SnapshotHeader>() == 40);
const _: () = assert!(core::mem::size_of::<SnapshotHeader>() % 8 == 0);

/// Borrowed view of the state to serialize; `take_snapshot` never mutates
/// it.
pub struct SnapshotView<'a> {
    pub time: &'a TimeCtx,
    pub input: &'a InputCtx,
    pub net: &'a NetCtx,
    pub ring: &'a InputRing,
    pub user_blob: &'a [u8],
}

/// Mutable targets `restore` overwrites in place.
pub struct RestoreTarget<'a> {
    pub time: &'a mut TimeCtx,
    pub input: &'a mut InputCtx,
    pub net: &'a mut NetCtx,
    pub ring: &'a mut InputRing,
    pub user_blob: &'a mut [u8],
}

fn ring_bytes_len(ring: &InputRing) -> u32 {
    (ring.len() * MAX_PLAYERS * core::mem::size_of::<PlayerInput>()) as u32
}

/// spec.md §4.C `take_snapshot`.
pub fn take_snapshot(view: SnapshotView) -> Vec<u8> {
    let time_len = core::mem::size_of::<TimeCtx>() as u32;
    let input_len = core::mem::size_of::<InputCtx>() as u32;
    let net_len = core::mem::size_of::<NetCtx>() as u32;
    let events_len = ring_bytes_len(view.ring);
    let user_data_len = view.user_blob.len() as u32;
    let engine_data_len = time_len + input_len + net_len + events_len;
    let header_len = core::mem::size_of::<SnapshotHeader>() as u32;
    let snapshot_len = header_len + engine_data_len + user_data_len;

    let header = SnapshotHeader {
        version: SNAPSHOT_VERSION,
        user_data_len,
        engine_data_len,
        snapshot_len,
        time_len,
        input_len,
        net_len,
        events_len,
        input_buffer_len: events_len,
        reserved: 0,
    };

    let mut out = Vec::with_capacity(snapshot_len as usize);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(view.time.as_bytes());
    out.extend_from_slice(view.input.as_bytes());
    out.extend_from_slice(view.net.as_bytes());
    for slot in view.ring.linearize() {
        out.extend_from_slice(slot.as_bytes());
    }
    out.extend_from_slice(view.user_blob);
    out
}

/// spec.md §4.C `restore`. Validates header version and lengths before
/// writing anything; on error the targets are left untouched.
pub fn restore(bytes: &[u8], target: RestoreTarget) -> Result<(), TapeError> {
    let header_len = core::mem::size_of::<SnapshotHeader>();
    if bytes.len() < header_len {
        return Err(TapeError::SnapshotTruncated { needed: header_len, have: bytes.len() });
    }
    let header = SnapshotHeader::read_from_bytes(&bytes[..header_len])
        .expect("header_len-sized slice always parses");
    if header.version != SNAPSHOT_VERSION {
        return Err(TapeError::SnapshotVersionMismatch {
            expected: SNAPSHOT_VERSION,
            got: header.version,
        });
    }
    if header.events_len != header.input_buffer_len {
        return Err(TapeError::SnapshotTruncated {
            needed: header.events_len as usize,
            have: header.input_buffer_len as usize,
        });
    }
    if bytes.len() < header.snapshot_len as usize {
        return Err(TapeError::SnapshotTruncated {
            needed: header.snapshot_len as usize,
            have: bytes.len(),
        });
    }

    let expected_ring_len = ring_bytes_len(target.ring);
    if header.events_len != expected_ring_len {
        return Err(TapeError::SnapshotTruncated {
            needed: expected_ring_len as usize,
            have: header.events_len as usize,
        });
    }
    if header.user_data_len as usize != target.user_blob.len() {
        return Err(TapeError::SnapshotTruncated {
            needed: target.user_blob.len(),
            have: header.user_data_len as usize,
        });
    }

    let mut pos = header_len;
    let time_len = header.time_len as usize;
    let time = TimeCtx::read_from_bytes(&bytes[pos..pos + time_len])
        .map_err(|_| TapeError::SnapshotTruncated { needed: time_len, have: bytes.len() - pos })?;
    *target.time = time;
    pos += time_len;

    let input_len = header.input_len as usize;
    let input = InputCtx::read_from_bytes(&bytes[pos..pos + input_len])
        .map_err(|_| TapeError::SnapshotTruncated { needed: input_len, have: bytes.len() - pos })?;
    *target.input = input;
    pos += input_len;

    let net_len = header.net_len as usize;
    let net = NetCtx::read_from_bytes(&bytes[pos..pos + net_len])
        .map_err(|_| TapeError::SnapshotTruncated { needed: net_len, have: bytes.len() - pos })?;
    *target.net = net;
    pos += net_len;

    let ring_len = header.events_len as usize;
    let slot_size = core::mem::size_of::<PlayerInput>();
    let flat: Result<Vec<PlayerInput>, _> = bytes[pos..pos + ring_len]
        .chunks_exact(slot_size)
        .map(PlayerInput::read_from_bytes)
        .collect();
    let flat = flat.map_err(|_| TapeError::SnapshotTruncated { needed: ring_len, have: bytes.len() - pos })?;
    target
        .ring
        .delinearize(&flat)
        .map_err(|_| TapeError::SnapshotTruncated { needed: ring_len, have: flat.len() * slot_size })?;
    pos += ring_len;

    let user_len = header.user_data_len as usize;
    target.user_blob.copy_from_slice(&bytes[pos..pos + user_len]);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::input::KeyBits;

    fn sample_ring() -> InputRing {
        let mut ring = InputRing::new(128);
        let mut input = context::PlayerInput::default();
        input.keys[10].insert(KeyBits::HELD);
        ring.set(0, 3, input);
        ring
    }

    #[test]
    fn round_trips_full_state() {
        let time = TimeCtx { frame: 5, dt_ms: 16, total_ms: 80, reserved: [0; 8] };
        let input = InputCtx::default();
        let net = NetCtx::default();
        let ring = sample_ring();
        let user_blob = vec![1u8, 2, 3, 4];

        let bytes = take_snapshot(SnapshotView { time: &time, input: &input, net: &net, ring: &ring, user_blob: &user_blob });

        let mut time2 = TimeCtx::default();
        let mut input2 = InputCtx::default();
        let mut net2 = NetCtx::default();
        let mut ring2 = InputRing::new(128);
        let mut user_blob2 = vec![0u8; 4];

        restore(
            &bytes,
            RestoreTarget {
                time: &mut time2,
                input: &mut input2,
                net: &mut net2,
                ring: &mut ring2,
                user_blob: &mut user_blob2,
            },
        )
        .unwrap();

        assert_eq!(time2, time);
        assert_eq!(net2, net);
        assert_eq!(user_blob2, user_blob);
        assert_eq!(*ring2.get(0, 3), *ring.get(0, 3));
    }

    #[test]
    fn rejects_version_mismatch() {
        let time = TimeCtx::default();
        let input = InputCtx::default();
        let net = NetCtx::default();
        let ring = InputRing::new(128);
        let bytes = take_snapshot(SnapshotView { time: &time, input: &input, net: &net, ring: &ring, user_blob: &[] });

        let mut bytes = bytes;
        bytes[0] = 99;

        let mut time2 = TimeCtx::default();
        let mut input2 = InputCtx::default();
        let mut net2 = NetCtx::default();
        let mut ring2 = InputRing::new(128);
        let mut user_blob2: Vec<u8> = vec![];

        let err = restore(
            &bytes,
            RestoreTarget {
                time: &mut time2,
                input: &mut input2,
                net: &mut net2,
                ring: &mut ring2,
                user_blob: &mut user_blob2,
            },
        )
        .unwrap_err();
        assert_eq!(err, TapeError::SnapshotVersionMismatch { expected: SNAPSHOT_VERSION, got: 99 });
    }

    #[test]
    fn rejects_truncated_buffer() {
        let mut time2 = TimeCtx::default();
        let mut input2 = InputCtx::default();
        let mut net2 = NetCtx::default();
        let mut ring2 = InputRing::new(128);
        let mut user_blob2: Vec<u8> = vec![];
        let err = restore(
            &[0u8; 4],
            RestoreTarget {
                time: &mut time2,
                input: &mut input2,
                net: &mut net2,
                ring: &mut ring2,
                user_blob: &mut user_blob2,
            },
        )
        .unwrap_err();
        assert_eq!(err, TapeError::SnapshotTruncated { needed: 40, have: 4 });
    }
}

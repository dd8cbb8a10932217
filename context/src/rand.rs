// SPDX-License-Identifier: Apache-2.0

//! `RandCtx`: the deterministic RNG seed. User systems derive their own
//! PRNG state from this seed; the engine never reseeds on its own.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct RandCtx {
    pub seed: u32,
}

const _: () = assert!(core::mem::size_of::<RandCtx>() == 4);

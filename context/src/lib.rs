// SPDX-License-Identifier: Apache-2.0

//! Fixed-layout context blocks and the per-peer input ring.
//!
//! This crate owns the engine's external ABI: the byte-exact POD blocks
//! (`TimeCtx`, `InputCtx`, `NetCtx`, `RandCtx`, `ScreenCtx`, `VcrCtx`) that
//! are serialized into snapshots and tapes, the 16-byte tagged `Event`
//! record, and the power-of-two circular buffer of per-frame inputs that
//! bounds the rollback window.
//!
//! Nothing here advances time or decides whether to roll back; that lives
//! in the `engine` crate. This crate only defines what a frame of state
//! looks like and how raw events fold into it.

pub mod event;
pub mod input;
pub mod keys;
pub mod net;
pub mod rand;
pub mod region;
pub mod ring;
pub mod screen;
pub mod time;
pub mod vcr;

pub use event::{Event, EventKind, Source};
pub use input::{InputCtx, MouseRegion, PlayerInput, MAX_PLAYERS};
pub use net::{NetCtx, NetStatus, PeerCtx};
pub use rand::RandCtx;
pub use region::ContextRegion;
pub use ring::InputRing;
pub use screen::ScreenCtx;
pub use time::TimeCtx;
pub use vcr::VcrCtx;

/// Errors raised by context-region bookkeeping.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("ring overflow: frame is more than the ring length past the confirmed frame")]
    RingOverflow,
    #[error("context region was reallocated and this view is stale")]
    RegionDetached,
}

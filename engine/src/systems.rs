// SPDX-License-Identifier: Apache-2.0

//! User system dispatch and HMR handoff (spec.md §4.G, §6
//! `register_systems`).
//!
//! The engine owns the Contexts and the UserBlob; user systems only see
//! them through a borrowed [`UserSystemCtx`] for the duration of one
//! invocation, mirroring the teacher's pattern of handing backends a
//! narrow capability view rather than the whole manager.

use context::{InputCtx, NetCtx, RandCtx, ScreenCtx, TimeCtx};

/// Borrowed view handed to user systems once per step.
pub struct UserSystemCtx<'a> {
    pub time: &'a TimeCtx,
    pub input: &'a InputCtx,
    pub net: &'a NetCtx,
    pub rand: &'a mut RandCtx,
    pub screen: &'a ScreenCtx,
    pub user_blob: &'a mut [u8],
    /// Set while re-simulating a rollback; rendering/audio systems should
    /// skip side effects when this is true (spec.md §4.E step 5).
    pub is_resimulating: bool,
}

/// A registered table of user systems, invoked once per tick.
///
/// `system_id` lets a single table multiplex several systems (physics,
/// AI, audio) behind one handle, matching spec.md §6's
/// `register_systems(handle)` / `handle(system_id, ctx_ptr)` contract.
pub trait SystemTable: Send {
    fn invoke(&mut self, system_id: u32, ctx: &mut UserSystemCtx);

    /// How many systems this table dispatches, in invocation order.
    fn system_count(&self) -> u32;
}

/// A table with no registered systems; the default until
/// `register_systems` is called.
pub struct NoSystems;

impl SystemTable for NoSystems {
    fn invoke(&mut self, _system_id: u32, _ctx: &mut UserSystemCtx) {}

    fn system_count(&self) -> u32 {
        0
    }
}

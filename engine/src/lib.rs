// SPDX-License-Identifier: Apache-2.0

//! Deterministic rollback-netcode simulation core (spec.md overview): a
//! single [`Engine`] an embedder steps forward, feeds local input into via
//! `emit_*`, and synchronizes across peers via `receive_packet`/
//! `build_outbound_packet`.
//!
//! Mirrors the teacher's layering: `context` is the fixed-layout state
//! (the teacher's device/guest memory regions), `protocol` is the wire
//! format (the teacher's virtio queues), `tape` is persistence (the
//! teacher's snapshot/restore), and this crate is the orchestrator that
//! ties them together (the teacher's VMM).

mod api;
mod config;
mod error;
mod input_pipeline;
mod packet_io;
mod prediction;
mod recording;
mod rollback;
mod scheduler;
mod session;
pub mod systems;

pub use api::Engine;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use systems::{NoSystems, SystemTable, UserSystemCtx};

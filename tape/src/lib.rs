// SPDX-License-Identifier: Apache-2.0

//! Snapshot encoding (spec.md §4.C) and the append-only tape format
//! (spec.md §4.D) built on top of it.
//!
//! Tape recording and live rollback share the same snapshot machinery:
//! `snapshot::take_snapshot`/`restore` underlie both `Tape::start_recording`
//! and the rollback controller's per-step snapshots in the `engine` crate.

pub mod error;
pub mod format;
pub mod snapshot;

pub use error::TapeError;
pub use format::{load_tape, LoadedTape, Tape, TapeEventRecord, TapeHeader, TapePacketRecord, TAPE_MAGIC, TAPE_VERSION};
pub use snapshot::{restore, take_snapshot, RestoreTarget, SnapshotHeader, SnapshotView, SNAPSHOT_VERSION};

// SPDX-License-Identifier: Apache-2.0

//! Rollback decision and resimulation (spec.md §4.E): when a packet
//! corrects a frame we already simulated, restore the UserBlob/InputCtx as
//! of the nearest snapshot at or before it and replay forward using the
//! ring's now-corrected contents.
//!
//! Only the UserBlob and InputCtx come from the snapshot. `TimeCtx` and
//! `NetCtx` (peer seq/ack, rollback counters, match_frame) keep advancing
//! live and must not be clobbered by an old snapshot's copies; the ring
//! must not be touched either, since it already holds the correction that
//! triggered this rollback in the first place.

use context::{InputCtx, InputRing};

use crate::api::Engine;

impl Engine {
    /// If a packet corrected a frame at or before `current_match_frame`
    /// since the last tick, roll back to it and resimulate up to (but not
    /// including) `current_match_frame`, which the caller is about to
    /// produce fresh. Updates `last_rollback_depth`/`total_rollbacks`/
    /// `frames_resimulated` (spec.md §4.E step 7).
    pub(crate) fn rollback_if_needed(&mut self, current_match_frame: u32) {
        let Some(earliest) = self.earliest_new_remote_frame.take() else {
            return;
        };
        if earliest >= current_match_frame {
            return;
        }

        // `snapshots[k]` holds the state *before* frame `k` runs, so the
        // snapshot we need is the one keyed exactly at (or just before)
        // `earliest` itself.
        let Some((&snapshot_key, snapshot_bytes)) = self.snapshot_at_or_before(earliest) else {
            log::warn!("rollback requested to frame {earliest} but no snapshot covers it");
            return;
        };
        let snapshot_bytes = snapshot_bytes.clone();

        let mut scratch_time = context::TimeCtx::default();
        let mut scratch_net = context::NetCtx::default();
        let mut scratch_ring = InputRing::new(self.ring.len());
        let mut scratch_input = InputCtx::default();
        let mut scratch_user_blob = vec![0u8; self.user_blob.len()];
        if let Err(err) = tape::restore(
            &snapshot_bytes,
            tape::RestoreTarget {
                time: &mut scratch_time,
                input: &mut scratch_input,
                net: &mut scratch_net,
                ring: &mut scratch_ring,
                user_blob: &mut scratch_user_blob,
            },
        ) {
            log::warn!("rollback restore before frame {snapshot_key} failed: {err}");
            return;
        }
        self.ctx.input = scratch_input;
        self.user_blob = scratch_user_blob;

        let last_confirmed_frame = current_match_frame - 1;
        for frame in snapshot_key..=last_confirmed_frame {
            self.refresh_stale_predictions(frame);
            self.run_frame(frame, true);
        }

        let depth = last_confirmed_frame - snapshot_key + 1;
        self.ctx.net.record_rollback(depth);
        log::info!("rollback: resimulated frames {snapshot_key}..={last_confirmed_frame} (depth={depth})");
    }
}

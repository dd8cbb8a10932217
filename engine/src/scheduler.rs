// SPDX-License-Identifier: Apache-2.0

//! The fixed-timestep scheduler (spec.md §4.G, §6 `step`/`seek`): an
//! accumulator that turns wall-clock milliseconds into a whole number of
//! deterministic simulation ticks, plus deterministic fast-forward from a
//! snapshot.

use crate::api::Engine;
use crate::error::Result;

impl Engine {
    /// spec.md §6 `step(elapsed_ms)`: advance by as many fixed `dt_ms`
    /// ticks as `elapsed_ms` covers, carrying any remainder in the
    /// millisecond accumulator (spec.md §4.G).
    pub fn step(&mut self, elapsed_ms: u32) -> Result<()> {
        self.acc_ms += elapsed_ms;
        while self.acc_ms >= self.config.dt_ms {
            self.tick_once()?;
            self.acc_ms -= self.config.dt_ms;
        }
        Ok(())
    }

    /// One fixed-duration tick: assemble local input, fill in remote
    /// predictions for peers without data yet, run the frame, and advance
    /// time. Rollback for packets that already arrived is resolved
    /// synchronously in `receive_packet`, not here (spec.md §4.G: the host
    /// serializes `step`/`receive_packet` calls).
    fn tick_once(&mut self) -> Result<()> {
        self.apply_net_intents();
        self.apply_vcr_intents();

        let next_raw_frame = self.ctx.time.frame + 1;
        let next_match_frame = if self.ctx.net.in_session != 0 {
            next_raw_frame - self.ctx.net.session_start_frame
        } else {
            next_raw_frame
        };

        let confirmed = self.ctx.net.confirmed_frame().map(i64::from).unwrap_or(-1);
        self.ring.check_window(next_match_frame, confirmed)?;

        self.assemble_local_input(next_match_frame);
        if self.ctx.net.in_session != 0 {
            self.ensure_remote_predictions(next_match_frame);
        }
        self.run_frame(next_match_frame, false);

        self.ctx.net.match_frame = next_match_frame;
        self.ctx.time.tick(self.config.dt_ms);
        self.evict_old_snapshots(next_match_frame);

        Ok(())
    }

    /// spec.md §6 `seek(target_frame)`: restore the latest snapshot at or
    /// before `target_frame` and tick forward deterministically until
    /// reaching it. If a tape was loaded, replays its recorded input
    /// instead of requiring fresh `emit_*` calls; `acc_ms` is untouched.
    pub fn seek(&mut self, target_frame: u32) -> Result<()> {
        let Some((&snapshot_key, bytes)) = self.snapshot_at_or_before(target_frame) else {
            return Ok(());
        };
        if snapshot_key > target_frame {
            return Ok(());
        }
        let bytes = bytes.clone();
        self.restore(&bytes)?;

        for frame in snapshot_key..=target_frame {
            let replay_inputs: Vec<(u8, Vec<context::Event>)> = match self.loaded_tape.as_ref() {
                Some(tape) => self
                    .replay_peers
                    .iter()
                    .map(|&peer| {
                        let events =
                            tape.events_for_frame(frame).filter(|r| r.peer == peer).map(|r| r.event).collect();
                        (peer, events)
                    })
                    .collect(),
                None => Vec::new(),
            };
            for (peer, events) in replay_inputs {
                self.apply_remote_frame(peer, frame, &events);
            }

            self.run_frame(frame, true);
            self.ctx.net.match_frame = frame;
            self.ctx.time.tick(self.config.dt_ms);
        }

        Ok(())
    }
}

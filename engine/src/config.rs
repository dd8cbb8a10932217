// SPDX-License-Identifier: Apache-2.0

//! Engine-wide tunables (spec.md §4.G, §6 Limits), grouped the way
//! `InputConfig` groups backend choice and feature flags in the teacher's
//! input manager.

/// spec.md §4.G: "default 16 ms ≈ 62.5 Hz".
pub const DEFAULT_DT_MS: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fixed step duration in milliseconds.
    pub dt_ms: u32,
    /// Per-peer input ring length; power of two, >= 128 (spec.md §6 Limits).
    pub ring_len: usize,
    /// Tape event-log capacity; <= 65535 (spec.md §6 Limits).
    pub max_events: u32,
    /// Outbound packet size cap in bytes; <= 1 MiB (spec.md §6 Limits).
    pub max_packet_bytes: u32,
}

impl EngineConfig {
    /// Default configuration: 16ms step, 128-frame ring, full-size tape
    /// and packet budgets.
    pub fn new() -> Self {
        Self { dt_ms: DEFAULT_DT_MS, ring_len: context::ring::DEFAULT_RING_LEN, max_events: 65_535, max_packet_bytes: 1 << 20 }
    }

    /// Configuration for rollback-heavy test harnesses: a wider ring so
    /// deep resimulation windows don't hit `RingOverflow`.
    pub fn wide_window() -> Self {
        Self { ring_len: 1024, ..Self::new() }
    }

    /// Configuration for short deterministic replays, where a small ring
    /// and tight packet budget are enough.
    pub fn compact() -> Self {
        Self { ring_len: 128, max_events: 4096, max_packet_bytes: 64 * 1024, ..Self::new() }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

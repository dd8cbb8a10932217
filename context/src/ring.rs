// SPDX-License-Identifier: Apache-2.0

//! The per-peer input ring: a power-of-two circular buffer of
//! `PlayerInput` slots that bounds the rollback window (spec.md §3, §6).
//!
//! Growing the ring (e.g. a new session picking a larger window)
//! reallocates storage and bumps a generation counter; any snapshot
//! handle captured against an older generation is stale and must be
//! re-resolved, per the detachment model in spec.md §9.

use crate::input::{PlayerInput, MAX_PLAYERS};
use crate::ContextError;

/// Default ring length, spec.md §6 Limits ("ring_len power of two ≥ 128").
pub const DEFAULT_RING_LEN: usize = 128;

pub struct InputRing {
    /// `slots[peer][frame % ring_len]`.
    slots: Vec<[PlayerInput; MAX_PLAYERS]>,
    len: usize,
    generation: u64,
}

impl InputRing {
    /// `ring_len` must be a power of two and at least 128.
    pub fn new(ring_len: usize) -> Self {
        assert!(ring_len.is_power_of_two(), "ring_len must be a power of two");
        assert!(ring_len >= DEFAULT_RING_LEN, "ring_len must be >= {DEFAULT_RING_LEN}");
        Self {
            slots: vec![[PlayerInput::default(); MAX_PLAYERS]; ring_len],
            len: ring_len,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reallocate to a new ring length, invalidating any previously
    /// captured generation.
    pub fn resize(&mut self, new_len: usize) {
        assert!(new_len.is_power_of_two());
        let mut new_slots = vec![[PlayerInput::default(); MAX_PLAYERS]; new_len];
        let carry = self.len.min(new_len);
        for i in 0..carry {
            new_slots[i] = self.slots[i];
        }
        self.slots = new_slots;
        self.len = new_len;
        self.generation += 1;
    }

    fn index(&self, frame: u32) -> usize {
        frame as usize & (self.len - 1)
    }

    /// Reject writes to a frame that has fallen more than `ring_len`
    /// behind the confirmed frame (spec.md §7, `RingOverflow`).
    pub fn check_window(&self, frame: u32, confirmed_frame: i64) -> Result<(), ContextError> {
        if i64::from(frame) + self.len as i64 <= confirmed_frame {
            return Err(ContextError::RingOverflow);
        }
        Ok(())
    }

    pub fn get(&self, peer: usize, frame: u32) -> &PlayerInput {
        &self.slots[self.index(frame)][peer]
    }

    pub fn get_mut(&mut self, peer: usize, frame: u32) -> &mut PlayerInput {
        let idx = self.index(frame);
        &mut self.slots[idx][peer]
    }

    pub fn set(&mut self, peer: usize, frame: u32, input: PlayerInput) {
        let idx = self.index(frame);
        self.slots[idx][peer] = input;
    }

    /// Linearize the whole ring as `(MAX_PLAYERS * ring_len)` slots, in
    /// peer-major, then-slot order, for the Snapshot encoding of spec.md
    /// §4.C.
    pub fn linearize(&self) -> Vec<PlayerInput> {
        let mut out = Vec::with_capacity(self.len * MAX_PLAYERS);
        for peer in 0..MAX_PLAYERS {
            for slot in &self.slots {
                out.push(slot[peer]);
            }
        }
        out
    }

    /// Inverse of [`InputRing::linearize`]: restore ring contents from a
    /// flat slot sequence of the same shape.
    pub fn delinearize(&mut self, flat: &[PlayerInput]) -> Result<(), ContextError> {
        if flat.len() != self.len * MAX_PLAYERS {
            return Err(ContextError::RegionDetached);
        }
        for peer in 0..MAX_PLAYERS {
            for (slot_idx, slot) in self.slots.iter_mut().enumerate() {
                slot[peer] = flat[peer * self.len + slot_idx];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around_power_of_two_length() {
        let mut ring = InputRing::new(128);
        let mut input = PlayerInput::default();
        input.keys[5].insert(crate::input::KeyBits::HELD);
        ring.set(0, 5, input);
        ring.set(0, 5 + 128, PlayerInput::default());
        // Same slot: later write wins.
        assert_eq!(*ring.get(0, 5), PlayerInput::default());
    }

    #[test]
    fn linearize_round_trips() {
        let mut ring = InputRing::new(128);
        let mut input = PlayerInput::default();
        input.keys[1].insert(crate::input::KeyBits::HELD);
        ring.set(3, 10, input);

        let flat = ring.linearize();
        let mut restored = InputRing::new(128);
        restored.delinearize(&flat).unwrap();
        assert_eq!(*restored.get(3, 10), input);
    }

    #[test]
    fn resize_bumps_generation_and_carries_slots() {
        let mut ring = InputRing::new(128);
        let mut input = PlayerInput::default();
        input.keys[1].insert(crate::input::KeyBits::HELD);
        ring.set(0, 3, input);
        let gen_before = ring.generation();
        ring.resize(256);
        assert_eq!(ring.generation(), gen_before + 1);
        assert_eq!(*ring.get(0, 3), input);
    }

    #[test]
    fn check_window_rejects_frames_past_the_ring() {
        let ring = InputRing::new(128);
        assert!(ring.check_window(200, 50).is_ok());
        assert!(ring.check_window(50, 200).is_err());
    }
}

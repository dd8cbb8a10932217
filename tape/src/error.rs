// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TapeError {
    #[error("snapshot version mismatch: expected {expected}, got {got}")]
    SnapshotVersionMismatch { expected: u32, got: u32 },
    #[error("snapshot buffer truncated: needed {needed} bytes, have {have}")]
    SnapshotTruncated { needed: usize, have: usize },
    #[error("invalid tape magic: expected {expected:#010x}, got {got:#010x}")]
    InvalidTapeMagic { expected: u32, got: u32 },
    #[error("invalid tape version: expected {expected}, got {got}")]
    InvalidTapeVersion { expected: u16, got: u16 },
    #[error("tape buffer truncated: needed {needed} bytes, have {have}")]
    TapeTruncated { needed: usize, have: usize },
}

// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unsupported packet version {got}, expected {expected}")]
    InvalidVersion { got: u8, expected: u8 },
    #[error("packet declares {declared} events but only {available} bytes remain")]
    EventsOverflow { declared: u16, available: usize },
    #[error("packet shorter than its fixed header ({0} bytes)")]
    Truncated(usize),
    #[error("unknown event kind tag {0}")]
    InvalidEventKind(u8),
}

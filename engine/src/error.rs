// SPDX-License-Identifier: Apache-2.0

//! Top-level error type (spec.md §7), aggregating the leaf crates' errors
//! the way `InputError` wraps backend-specific failures in the teacher's
//! input manager.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Context(#[from] context::ContextError),

    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),

    #[error(transparent)]
    Tape(#[from] tape::TapeError),

    #[error("packet targets peer {0}, which is not connected")]
    PeerNotConnected(u8),

    #[error("confirmed frame would regress for peer {peer} from {old} to {new}")]
    ConfirmedFrameRegression { peer: u8, old: i32, new: i32 },

    #[error("session operation attempted while not in session")]
    SessionNotInitialized,
}

pub type Result<T> = std::result::Result<T, EngineError>;

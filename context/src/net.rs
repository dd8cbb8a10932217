// SPDX-License-Identifier: Apache-2.0

//! `NetCtx`: per-session networking state, the rollback-relevant peer
//! table, and rollback statistics.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::input::MAX_PLAYERS;

/// Session connection state machine, spec.md §4.G.
///
/// `offline -> local -> join:pending -> connected -> disconnected -> offline`
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NetStatus {
    #[default]
    Offline = 0,
    Local = 1,
    JoinPending = 2,
    Connected = 3,
    Disconnected = 4,
}

impl TryFrom<u8> for NetStatus {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NetStatus::Offline),
            1 => Ok(NetStatus::Local),
            2 => Ok(NetStatus::JoinPending),
            3 => Ok(NetStatus::Connected),
            4 => Ok(NetStatus::Disconnected),
            _ => Err("invalid NetStatus value"),
        }
    }
}

/// Per-peer sequence/ack bookkeeping, spec.md §4.F.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PeerCtx {
    pub connected: u8,
    _pad: u8,
    /// Highest MatchFrame we have received from this peer, or -1 if none.
    /// This is also what we report as our `ack` in packets sent to them.
    pub seq: i16,
    /// Highest MatchFrame this peer has acknowledged receiving from us, or
    /// -1 if none; copied from the `ack` field of their packets. Bounds the
    /// window `build_outbound_packet` still needs to send them.
    pub ack: i16,
}

const _: () = assert!(core::mem::size_of::<PeerCtx>() == 6);

impl PeerCtx {
    pub const fn disconnected() -> Self {
        Self { connected: 0, _pad: 0, seq: -1, ack: -1 }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct NetCtx {
    pub peer_count: u8,
    pub local_peer_id: u8,
    pub in_session: u8,
    pub status: u8,
    pub match_frame: u32,
    pub session_start_frame: u32,
    pub room_code: [u8; 8],
    pub wants_room_code: [u8; 8],
    pub wants_disconnect: u8,
    _pad: [u8; 3],
    pub peers: [PeerCtx; MAX_PLAYERS],
    pub last_rollback_depth: u32,
    pub total_rollbacks: u32,
    pub frames_resimulated: u64,
}

const _: () = assert!(core::mem::size_of::<NetCtx>() == 120);
const _: () = assert!(core::mem::align_of::<NetCtx>() == 8);

impl Default for NetCtx {
    fn default() -> Self {
        Self {
            peer_count: 0,
            local_peer_id: 0,
            in_session: 0,
            status: NetStatus::Offline as u8,
            match_frame: 0,
            session_start_frame: 0,
            room_code: [0; 8],
            wants_room_code: [0; 8],
            wants_disconnect: 0,
            _pad: [0; 3],
            peers: [PeerCtx::disconnected(); MAX_PLAYERS],
            last_rollback_depth: 0,
            total_rollbacks: 0,
            frames_resimulated: 0,
        }
    }
}

impl NetCtx {
    pub fn status(&self) -> NetStatus {
        NetStatus::try_from(self.status).unwrap_or_default()
    }

    pub fn set_status(&mut self, status: NetStatus) {
        self.status = status as u8;
    }

    /// `confirmed_frame = min over connected peers of peer.seq`; peers with
    /// no data (`seq == -1`) do not participate in the min. `None` when no
    /// peer is connected.
    pub fn confirmed_frame(&self) -> Option<i32> {
        self.peers
            .iter()
            .take(self.peer_count as usize)
            .filter(|p| p.connected != 0 && p.seq >= 0)
            .map(|p| i32::from(p.seq))
            .min()
    }

    pub fn record_rollback(&mut self, depth: u32) {
        self.last_rollback_depth = depth;
        self.total_rollbacks += 1;
        self.frames_resimulated += u64::from(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_frame_skips_unconfirmed_peers() {
        let mut net = NetCtx::default();
        net.peer_count = 2;
        net.peers[0] = PeerCtx { connected: 1, _pad: 0, seq: 5, ack: 5 };
        net.peers[1] = PeerCtx::disconnected();
        assert_eq!(net.confirmed_frame(), None);

        net.peers[1] = PeerCtx { connected: 1, _pad: 0, seq: 3, ack: 3 };
        assert_eq!(net.confirmed_frame(), Some(3));
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Per-peer packet codec (spec.md §4.F): builds and parses the outbound
//! wire packet, with a bounded event window and oldest-first truncation
//! when a packet would exceed `max_packet_bytes`.
//!
//! This crate only knows about bytes and frame numbers; it has no notion
//! of peer connection state, rings, or rollback. The `engine` crate wires
//! packet ingestion into the session and rollback controller.

pub mod error;
pub mod packet;

pub use error::ProtocolError;
pub use packet::{build_outbound_packet, EventRecord, EventSource, OutboundPacket, PACKET_VERSION};

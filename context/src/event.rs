// SPDX-License-Identifier: Apache-2.0

//! The tagged 16-byte `Event` record (spec.md §3) and its wire encoding.
//!
//! `Event` carries a variant payload, a `source` peer id (0-11), and an
//! `origin` tag. Because the payload varies in size across variants this
//! is hand-encoded rather than derived through `zerocopy` — the same
//! choice the teacher makes for `VirtioInputEvent`-style records whose
//! `(type, code, value)` triple is interpreted differently per type.

/// Where an event entered the system.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Local = 0,
    Remote = 1,
    Tape = 2,
}

impl TryFrom<u8> for Source {
    type Error = EventDecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Source::Local),
            1 => Ok(Source::Remote),
            2 => Ok(Source::Tape),
            _ => Err(EventDecodeError::InvalidOrigin(value)),
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventKind {
    KeyDown { key: u8 } = 0,
    KeyUp { key: u8 } = 1,
    MouseMove { x: f32, y: f32 } = 2,
    MouseWheel { dx: f32, dy: f32 } = 3,
    MouseDown { button: u8 } = 4,
    MouseUp { button: u8 } = 5,
}

impl EventKind {
    fn tag(&self) -> u8 {
        match self {
            EventKind::KeyDown { .. } => 0,
            EventKind::KeyUp { .. } => 1,
            EventKind::MouseMove { .. } => 2,
            EventKind::MouseWheel { .. } => 3,
            EventKind::MouseDown { .. } => 4,
            EventKind::MouseUp { .. } => 5,
        }
    }
}

pub const EVENT_WIRE_SIZE: usize = 16;

/// A single input event, carried in a peer's per-frame event list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Originating peer id, 0..MAX_PLAYERS.
    pub source: u8,
    pub origin: Source,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventDecodeError {
    #[error("unknown event tag {0}")]
    InvalidTag(u8),
    #[error("unknown event origin {0}")]
    InvalidOrigin(u8),
    #[error("event record must be {EVENT_WIRE_SIZE} bytes, got {0}")]
    WrongLength(usize),
}

impl Event {
    pub fn to_wire(self) -> [u8; EVENT_WIRE_SIZE] {
        let mut buf = [0u8; EVENT_WIRE_SIZE];
        buf[0] = self.kind.tag();
        match self.kind {
            EventKind::KeyDown { key } | EventKind::KeyUp { key } => {
                buf[1] = key;
            }
            EventKind::MouseMove { x, y } => {
                buf[1..5].copy_from_slice(&x.to_le_bytes());
                buf[5..9].copy_from_slice(&y.to_le_bytes());
            }
            EventKind::MouseWheel { dx, dy } => {
                buf[1..5].copy_from_slice(&dx.to_le_bytes());
                buf[5..9].copy_from_slice(&dy.to_le_bytes());
            }
            EventKind::MouseDown { button } | EventKind::MouseUp { button } => {
                buf[1] = button;
            }
        }
        buf[14] = self.source;
        buf[15] = self.origin as u8;
        buf
    }

    pub fn from_wire(buf: &[u8]) -> Result<Self, EventDecodeError> {
        if buf.len() != EVENT_WIRE_SIZE {
            return Err(EventDecodeError::WrongLength(buf.len()));
        }
        let kind = match buf[0] {
            0 => EventKind::KeyDown { key: buf[1] },
            1 => EventKind::KeyUp { key: buf[1] },
            2 => EventKind::MouseMove {
                x: f32::from_le_bytes(buf[1..5].try_into().unwrap()),
                y: f32::from_le_bytes(buf[5..9].try_into().unwrap()),
            },
            3 => EventKind::MouseWheel {
                dx: f32::from_le_bytes(buf[1..5].try_into().unwrap()),
                dy: f32::from_le_bytes(buf[5..9].try_into().unwrap()),
            },
            4 => EventKind::MouseDown { button: buf[1] },
            5 => EventKind::MouseUp { button: buf[1] },
            other => return Err(EventDecodeError::InvalidTag(other)),
        };
        let source = buf[14];
        let origin = Source::try_from(buf[15])?;
        Ok(Event { kind, source, origin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant() {
        let events = [
            Event { kind: EventKind::KeyDown { key: 41 }, source: 0, origin: Source::Local },
            Event { kind: EventKind::KeyUp { key: 41 }, source: 1, origin: Source::Remote },
            Event {
                kind: EventKind::MouseMove { x: 1.5, y: -2.5 },
                source: 2,
                origin: Source::Tape,
            },
            Event {
                kind: EventKind::MouseWheel { dx: 0.0, dy: 3.0 },
                source: 0,
                origin: Source::Local,
            },
            Event { kind: EventKind::MouseDown { button: 0 }, source: 0, origin: Source::Local },
            Event { kind: EventKind::MouseUp { button: 2 }, source: 0, origin: Source::Local },
        ];
        for event in events {
            let wire = event.to_wire();
            assert_eq!(wire.len(), EVENT_WIRE_SIZE);
            assert_eq!(Event::from_wire(&wire).unwrap(), event);
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        let mut wire = [0u8; EVENT_WIRE_SIZE];
        wire[0] = 9;
        assert_eq!(Event::from_wire(&wire), Err(EventDecodeError::InvalidTag(9)));
    }
}

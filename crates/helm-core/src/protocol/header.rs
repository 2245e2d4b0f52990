//! Frame header codec and validation for the game's binary wire protocol.
//!
//! Wire format (six little-endian `u32` fields):
//! ```text
//! [preamble:4][length:4][origin:4][padding:4][remaining:4][packet_type:4][payload:N]
//! ```
//! Total header size: 24 bytes. `length` counts the whole frame including the
//! header, so `N == length - 24`. `remaining` counts every byte after the
//! `preamble` and `length` fields; a consistent header therefore satisfies
//! `remaining == length - 20`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker constant opening every frame on the wire.
pub const PREAMBLE: u32 = 0xDEAD_BEEF;

/// Size of the fixed frame header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Smallest legal value of the header `length` field (a bare header).
pub const MIN_FRAME_LEN: u32 = HEADER_SIZE as u32;

/// Largest legal value of the header `length` field.
pub const MAX_FRAME_LEN: u32 = 65_536;

// ── Origin ────────────────────────────────────────────────────────────────────

/// Which side of a connection produced a frame.
///
/// A reader validates that inbound frames carry the origin of the *peer*:
/// the probe connects to the game service and expects [`Origin::Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum Origin {
    Server = 1,
    Client = 2,
}

impl TryFrom<u32> for Origin {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Origin::Server),
            2 => Ok(Origin::Client),
            _ => Err(()),
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Header validation failures. All of these are fatal to the connection that
/// produced the frame; none of them may be silently ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The first field was not the `0xDEADBEEF` marker.
    #[error("expected preamble 0xdeadbeef but got 0x{found:08x}")]
    InvalidPreamble { found: u32 },

    /// The declared frame length falls outside `[24, 65536]`.
    #[error("invalid frame length {found} (valid range 24..=65536)")]
    InvalidLength { found: u32 },

    /// The frame was produced by the wrong side of the connection.
    #[error("expected origin {expected:?} but got {found}")]
    UnexpectedOrigin { expected: Origin, found: u32 },

    /// The `remaining` field disagrees with the declared length.
    #[error("expected remaining={expected} for length={length} but got {found}")]
    InconsistentRemaining { length: u32, expected: u32, found: u32 },
}

// ── Header ────────────────────────────────────────────────────────────────────

/// The fixed 24-byte header opening every frame.
///
/// Fields are kept as raw `u32`s: decoding never fails, and validation is a
/// separate, explicit step so a reader can report exactly which rule a bad
/// header broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub preamble: u32,
    pub length: u32,
    pub origin: u32,
    /// Reserved by the wire format; carried through but never validated.
    pub padding: u32,
    pub remaining: u32,
    pub packet_type: u32,
}

impl FrameHeader {
    /// Builds the header for an outbound frame carrying `payload_len` bytes.
    pub fn for_payload(origin: Origin, packet_type: u32, payload_len: usize) -> Self {
        let payload_len = payload_len as u32;
        Self {
            preamble: PREAMBLE,
            length: MIN_FRAME_LEN + payload_len,
            origin: origin as u32,
            padding: 0,
            remaining: payload_len + 4,
            packet_type,
        }
    }

    /// Decodes a header from its 24-byte wire representation.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let field = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        Self {
            preamble: field(0),
            length: field(4),
            origin: field(8),
            padding: field(12),
            remaining: field(16),
            packet_type: field(20),
        }
    }

    /// Encodes the header into its 24-byte wire representation.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.preamble.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.length.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.origin.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.padding.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.remaining.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.packet_type.to_le_bytes());
        bytes
    }

    /// Number of payload bytes following a header that passed [`validate`].
    ///
    /// [`validate`]: FrameHeader::validate
    pub fn payload_len(&self) -> usize {
        (self.length as usize).saturating_sub(HEADER_SIZE)
    }

    /// Checks the header against the protocol rules, in order: preamble,
    /// length bounds, origin, remaining-count consistency.
    ///
    /// # Errors
    ///
    /// Returns the [`FrameError`] for the first rule the header breaks.
    pub fn validate(&self, expected_origin: Origin) -> Result<(), FrameError> {
        if self.preamble != PREAMBLE {
            return Err(FrameError::InvalidPreamble {
                found: self.preamble,
            });
        }
        if self.length < MIN_FRAME_LEN || self.length > MAX_FRAME_LEN {
            return Err(FrameError::InvalidLength { found: self.length });
        }
        if self.origin != expected_origin as u32 {
            return Err(FrameError::UnexpectedOrigin {
                expected: expected_origin,
                found: self.origin,
            });
        }
        let expected_remaining = self.length - 20;
        if self.remaining != expected_remaining {
            return Err(FrameError::InconsistentRemaining {
                length: self.length,
                expected: expected_remaining,
                found: self.remaining,
            });
        }
        Ok(())
    }
}

/// Builds one contiguous header-plus-payload buffer for an outbound frame so
/// the send path can hand the whole frame to a single write.
pub fn frame_bytes(origin: Origin, packet_type: u32, payload: &[u8]) -> Vec<u8> {
    let header = FrameHeader::for_payload(origin, packet_type, payload.len());
    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&header.encode());
    bytes.extend_from_slice(payload);
    bytes
}

// ── Tests ─────────────────────────────────────────────────────────────────────

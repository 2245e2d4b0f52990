//! Typed packet model for the game's binary protocol.
//!
//! Only three payload layouts are recognized; the game emits many more packet
//! types, and all of them must be tolerated. Decoding a packet can therefore
//! fail in two non-fatal ways — unknown type or wrong payload size — and the
//! caller is expected to log and move on to the next frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::header::HEADER_SIZE;

/// Packet-type discriminators with a known payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum PacketType {
    Difficulty = 0x3DE6_6711,
    Version = 0xE548_E74A,
    Welcome = 0x6D04_B3DA,
}

impl TryFrom<u32> for PacketType {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x3DE6_6711 => Ok(PacketType::Difficulty),
            0xE548_E74A => Ok(PacketType::Version),
            0x6D04_B3DA => Ok(PacketType::Welcome),
            _ => Err(()),
        }
    }
}

/// One complete frame as delivered by the framing layer: the raw type
/// discriminator and the payload bytes, with the header already stripped
/// and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub packet_type: u32,
    pub payload: Vec<u8>,
}

impl RawFrame {
    /// Total on-wire size of the frame this was extracted from.
    pub fn wire_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

// ── Payload layouts ───────────────────────────────────────────────────────────

/// Expected payload size of a [`PacketType::Difficulty`] frame.
pub const DIFFICULTY_PAYLOAD_LEN: usize = 8;

/// Expected payload size of a [`PacketType::Version`] frame.
pub const VERSION_PAYLOAD_LEN: usize = 24;

/// Difficulty announcement: two little-endian `u32`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyReport {
    pub difficulty: u32,
    pub game_type: u32,
}

/// Server version triple, read from the first 12 payload bytes.
/// The trailing 12 bytes of the payload are reserved by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// A decoded packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePacket {
    Difficulty(DifficultyReport),
    Version(GameVersion),
    /// Free-text greeting, one byte per character (Latin-1).
    Welcome(String),
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Non-fatal packet decode failures. The stream stays usable; only the one
/// offending packet is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketDecodeError {
    /// The type code has no known payload layout.
    #[error("unknown packet type 0x{type_code:08x} (payload {payload_len} bytes)")]
    UnknownType { type_code: u32, payload_len: usize },

    /// A recognized type arrived with the wrong payload size.
    #[error("{packet:?} payload must be {expected} bytes, got {actual}")]
    PayloadSizeMismatch {
        packet: PacketType,
        expected: usize,
        actual: usize,
    },
}

/// Decodes a payload according to its type code.
///
/// # Errors
///
/// Returns [`PacketDecodeError::UnknownType`] for unrecognized codes and
/// [`PacketDecodeError::PayloadSizeMismatch`] when a fixed-size layout
/// arrives with a different length. Both are non-fatal by contract.
pub fn decode_packet(type_code: u32, payload: &[u8]) -> Result<GamePacket, PacketDecodeError> {
    let packet_type =
        PacketType::try_from(type_code).map_err(|_| PacketDecodeError::UnknownType {
            type_code,
            payload_len: payload.len(),
        })?;

    match packet_type {
        PacketType::Difficulty => {
            require_len(packet_type, DIFFICULTY_PAYLOAD_LEN, payload)?;
            Ok(GamePacket::Difficulty(DifficultyReport {
                difficulty: read_u32(payload, 0),
                game_type: read_u32(payload, 4),
            }))
        }
        PacketType::Version => {
            require_len(packet_type, VERSION_PAYLOAD_LEN, payload)?;
            Ok(GamePacket::Version(GameVersion {
                major: read_u32(payload, 0),
                minor: read_u32(payload, 4),
                patch: read_u32(payload, 8),
            }))
        }
        PacketType::Welcome => Ok(GamePacket::Welcome(
            payload.iter().map(|&b| b as char).collect(),
        )),
    }
}

fn require_len(
    packet: PacketType,
    expected: usize,
    payload: &[u8],
) -> Result<(), PacketDecodeError> {
    if payload.len() != expected {
        return Err(PacketDecodeError::PayloadSizeMismatch {
            packet,
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

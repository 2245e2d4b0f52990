//! Maps decoded frames to typed handler calls.

use tracing::warn;

use crate::protocol::packets::{decode_packet, DifficultyReport, GamePacket, GameVersion, RawFrame};

/// Synchronous sink for decoded game packets.
///
/// Dispatch runs the handler to completion before the caller pulls the next
/// frame off the connection, so implementations never observe overlapping
/// calls.
pub trait PacketHandler {
    fn handle_difficulty(&mut self, report: DifficultyReport);
    fn handle_version(&mut self, version: GameVersion);
    fn handle_welcome(&mut self, message: &str);
}

/// Decodes `frame` and invokes the matching handler method.
///
/// Unknown packet types and payload size mismatches are logged with the type
/// code and payload length, and the frame is skipped; they must never
/// terminate the read loop.
pub fn dispatch_frame<H: PacketHandler>(frame: &RawFrame, handler: &mut H) {
    match decode_packet(frame.packet_type, &frame.payload) {
        Ok(GamePacket::Difficulty(report)) => handler.handle_difficulty(report),
        Ok(GamePacket::Version(version)) => handler.handle_version(version),
        Ok(GamePacket::Welcome(message)) => handler.handle_welcome(&message),
        Err(e) => warn!(
            type_code = frame.packet_type,
            payload_len = frame.payload.len(),
            "skipping undecodable packet: {e}"
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

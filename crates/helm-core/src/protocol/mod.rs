//! Binary protocol module: frame header codec, packet model, and dispatch.

pub mod dispatch;
pub mod header;
pub mod packets;

pub use dispatch::{dispatch_frame, PacketHandler};
pub use header::{frame_bytes, FrameError, FrameHeader, Origin, HEADER_SIZE, PREAMBLE};
pub use packets::{decode_packet, GamePacket, PacketDecodeError, PacketType, RawFrame};

/// TCP port the game's network service listens on.
pub const DEFAULT_GAME_PORT: u16 = 2010;

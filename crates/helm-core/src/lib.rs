//! # helm-core
//!
//! Shared library for Helm Control containing the game's binary wire-protocol
//! codec and the text command grammar.
//!
//! This crate is used by both the automation agent and the protocol probe.
//! It has zero dependencies on OS APIs or network sockets: framing I/O and
//! input injection live in the application crates.
//!
//! The two protocols defined here:
//!
//! - **`protocol`** – the game service's length-delimited binary protocol.
//!   Every frame opens with a fixed 24-byte little-endian header followed by
//!   a payload; three payload layouts are recognized and everything else is
//!   tolerated (logged and skipped, never a connection error).
//!
//! - **`command`** – the newline-delimited ASCII control protocol spoken by
//!   the agent's TCP command server: one case-insensitive keyword per line,
//!   one canned reply per command.

pub mod command;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `helm_core::FrameHeader` instead of `helm_core::protocol::header::FrameHeader`.
pub use command::{parse_command, Command, CommandBuffer, UnknownCommand};
pub use protocol::dispatch::{dispatch_frame, PacketHandler};
pub use protocol::header::{FrameError, FrameHeader, Origin};
pub use protocol::packets::{decode_packet, GamePacket, PacketDecodeError, RawFrame};

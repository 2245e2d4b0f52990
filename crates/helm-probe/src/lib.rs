//! helm-probe library entry point.
//!
//! The probe is the debugging-side counterpart of the agent: it opens one
//! outbound TCP connection to the game's network service, pulls framed
//! packets off the socket, and routes each one through the shared dispatcher
//! to a handler that logs what the game is saying.
//!
//! Module layout:
//!
//! - [`framing`] – turns a raw byte stream into validated frames, never
//!   exposing partial data.
//! - [`connection`] – owns the TCP stream and the outbound send path.
//! - [`handler`] – the logging [`helm_core::PacketHandler`] implementation.

pub mod connection;
pub mod framing;
pub mod handler;

pub use connection::{ConnectionError, GameConnection};
pub use framing::{FrameReader, ReadError};
pub use handler::LoggingHandler;

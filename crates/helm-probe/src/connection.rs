//! Outbound connection to the game's network service.
//!
//! Owns one TCP stream, drives the [`FrameReader`] over its read half, and
//! forwards every decoded frame through the shared dispatcher. There is no
//! automatic reconnect: a closed connection ends the session cleanly and a
//! protocol violation ends it with an error, and either way reconnection is
//! the caller's decision.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use helm_core::protocol::header::{frame_bytes, Origin};
use helm_core::{dispatch_frame, PacketHandler, RawFrame};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::framing::{FrameReader, ReadError};

/// Errors for establishing and using a game-service connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The TCP connection could not be established.
    #[error("failed to connect to game service at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Reading a frame failed (protocol violation or transport error).
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Writing an outbound frame failed.
    #[error("send failed: {0}")]
    Send(#[from] io::Error),
}

/// Client side of a connection to the game's network service.
pub struct GameConnection {
    reader: FrameReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer: SocketAddr,
}

impl GameConnection {
    /// Connects to the game service at `addr`.
    ///
    /// Inbound frames are required to carry [`Origin::Server`].
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::ConnectFailed`] when the TCP connect fails.
    pub async fn connect(addr: SocketAddr) -> Result<Self, ConnectionError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ConnectionError::ConnectFailed { addr, source })?;
        info!("connected to game service at {addr}");

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: FrameReader::new(read_half, Origin::Server),
            writer: write_half,
            peer: addr,
        })
    }

    /// Address of the game service this connection talks to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Reads the next frame, blocking until one has fully arrived.
    ///
    /// # Errors
    ///
    /// See [`FrameReader::read_frame`].
    pub async fn next_frame(&mut self) -> Result<RawFrame, ReadError> {
        self.reader.read_frame().await
    }

    /// Polls for a frame, returning `Ok(None)` if none starts arriving
    /// within `wait`.
    ///
    /// # Errors
    ///
    /// See [`FrameReader::read_frame_timeout`].
    pub async fn next_frame_timeout(
        &mut self,
        wait: Duration,
    ) -> Result<Option<RawFrame>, ReadError> {
        self.reader.read_frame_timeout(wait).await
    }

    /// Sends one frame with [`Origin::Client`], writing header and payload
    /// as a single buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Send`] when the write fails.
    pub async fn send_frame(
        &mut self,
        packet_type: u32,
        payload: &[u8],
    ) -> Result<(), ConnectionError> {
        let bytes = frame_bytes(Origin::Client, packet_type, payload);
        self.writer.write_all(&bytes).await?;
        debug!(packet_type, payload_len = payload.len(), "sent frame");
        Ok(())
    }

    /// Pulls frames and dispatches each one until the service closes the
    /// connection.
    ///
    /// A clean close by the peer returns `Ok(())`. Any protocol violation is
    /// fatal for this connection and is returned to the caller; no frame
    /// after the offending one is read.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ReadError`] for protocol violations and
    /// transport failures.
    pub async fn run_until_closed<H: PacketHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), ReadError> {
        loop {
            match self.reader.read_frame().await {
                Ok(frame) => dispatch_frame(&frame, handler),
                Err(ReadError::ConnectionClosed) => {
                    info!("game service closed the connection");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }
}

//! Async frame extraction from a byte stream.
//!
//! A [`FrameReader`] walks the stream through header → payload and only ever
//! hands complete frames to the caller. Reading loops on short reads, so a
//! frame split across any number of socket reads decodes identically to a
//! single-shot read.
//!
//! The optional timeout on [`FrameReader::read_frame_timeout`] applies to the
//! *first* byte of a new header only — "is there a packet at all right now".
//! Once one byte has arrived, the rest of the header and the payload are read
//! with no timeout, so callers may poll for packet arrival but can never
//! observe a torn packet.

use std::io;
use std::time::Duration;

use helm_core::protocol::header::{FrameHeader, Origin, HEADER_SIZE};
use helm_core::{FrameError, RawFrame};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

/// Errors produced while pulling a frame off a connection.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The peer ended the stream. Normal termination for the connection,
    /// not a process-level error.
    #[error("peer closed the connection")]
    ConnectionClosed,

    /// The header broke a protocol rule. Fatal to this connection.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The transport failed underneath us.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// Extracts validated frames from a byte stream.
pub struct FrameReader<R> {
    stream: R,
    expected_origin: Origin,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wraps `stream`, validating that every inbound frame carries
    /// `expected_origin`.
    pub fn new(stream: R, expected_origin: Origin) -> Self {
        Self {
            stream,
            expected_origin,
        }
    }

    /// Reads the next complete frame, blocking until it has fully arrived.
    ///
    /// # Errors
    ///
    /// [`ReadError::ConnectionClosed`] if the peer ends the stream at any
    /// point, [`ReadError::Frame`] if the header fails validation, and
    /// [`ReadError::Io`] for transport failures.
    pub async fn read_frame(&mut self) -> Result<RawFrame, ReadError> {
        let mut header_buf = [0u8; HEADER_SIZE];
        read_exact_or_closed(&mut self.stream, &mut header_buf).await?;
        self.finish_frame(header_buf).await
    }

    /// Like [`read_frame`], but gives up after `wait` if no frame has
    /// *started* to arrive, returning `Ok(None)` with no bytes consumed.
    ///
    /// [`read_frame`]: FrameReader::read_frame
    ///
    /// # Errors
    ///
    /// Same as [`FrameReader::read_frame`].
    pub async fn read_frame_timeout(
        &mut self,
        wait: Duration,
    ) -> Result<Option<RawFrame>, ReadError> {
        let mut header_buf = [0u8; HEADER_SIZE];
        match timeout(wait, self.stream.read(&mut header_buf[..1])).await {
            Err(_elapsed) => return Ok(None),
            Ok(Ok(0)) => return Err(ReadError::ConnectionClosed),
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e.into()),
        }
        read_exact_or_closed(&mut self.stream, &mut header_buf[1..]).await?;
        self.finish_frame(header_buf).await.map(Some)
    }

    /// Validates the header, then drains exactly the declared payload.
    async fn finish_frame(
        &mut self,
        header_buf: [u8; HEADER_SIZE],
    ) -> Result<RawFrame, ReadError> {
        let header = FrameHeader::decode(&header_buf);
        header.validate(self.expected_origin)?;

        let mut payload = vec![0u8; header.payload_len()];
        read_exact_or_closed(&mut self.stream, &mut payload).await?;

        Ok(RawFrame {
            packet_type: header.packet_type,
            payload,
        })
    }

    /// Consumes the reader and returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }
}

async fn read_exact_or_closed<R: AsyncRead + Unpin>(
    stream: &mut R,
    buf: &mut [u8],
) -> Result<(), ReadError> {
    match stream.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ReadError::ConnectionClosed),
        Err(e) => Err(ReadError::Io(e)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use helm_core::protocol::header::frame_bytes;
    use helm_core::protocol::packets::PacketType;
    use tokio::io::AsyncWriteExt;

    fn difficulty_frame() -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&5u32.to_le_bytes());
        payload.extend_from_slice(&2u32.to_le_bytes());
        frame_bytes(Origin::Server, PacketType::Difficulty as u32, &payload)
    }

    #[tokio::test]
    async fn test_read_frame_single_shot() {
        let (mut tx, rx) = tokio::io::duplex(256);
        tx.write_all(&difficulty_frame()).await.unwrap();

        let mut reader = FrameReader::new(rx, Origin::Server);
        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.packet_type, PacketType::Difficulty as u32);
        assert_eq!(frame.payload.len(), 8);
    }

    #[tokio::test]
    async fn test_read_frame_reassembles_byte_at_a_time_writes() {
        let (mut tx, rx) = tokio::io::duplex(16);
        let bytes = difficulty_frame();
        let writer = tokio::spawn(async move {
            for b in bytes {
                tx.write_all(&[b]).await.unwrap();
            }
        });

        let mut reader = FrameReader::new(rx, Origin::Server);
        let frame = reader.read_frame().await.unwrap();
        writer.await.unwrap();

        // Identical result to the single-shot read.
        assert_eq!(frame.packet_type, PacketType::Difficulty as u32);
        assert_eq!(frame.payload[..4], 5u32.to_le_bytes());
        assert_eq!(frame.payload[4..], 2u32.to_le_bytes());
    }

    #[tokio::test]
    async fn test_read_frame_reassembles_arbitrary_split_points() {
        let bytes = difficulty_frame();
        for split in 1..bytes.len() {
            let (mut tx, rx) = tokio::io::duplex(256);
            let (first, second) = (bytes[..split].to_vec(), bytes[split..].to_vec());
            let writer = tokio::spawn(async move {
                tx.write_all(&first).await.unwrap();
                tx.write_all(&second).await.unwrap();
            });

            let mut reader = FrameReader::new(rx, Origin::Server);
            let frame = reader.read_frame().await.unwrap();
            writer.await.unwrap();
            assert_eq!(frame.payload.len(), 8, "split at {split}");
        }
    }

    #[tokio::test]
    async fn test_read_frame_sequential_frames() {
        let (mut tx, rx) = tokio::io::duplex(256);
        tx.write_all(&difficulty_frame()).await.unwrap();
        tx.write_all(&frame_bytes(
            Origin::Server,
            PacketType::Welcome as u32,
            b"hi",
        ))
        .await
        .unwrap();

        let mut reader = FrameReader::new(rx, Origin::Server);
        let first = reader.read_frame().await.unwrap();
        let second = reader.read_frame().await.unwrap();
        assert_eq!(first.packet_type, PacketType::Difficulty as u32);
        assert_eq!(second.packet_type, PacketType::Welcome as u32);
        assert_eq!(second.payload, b"hi");
    }

    #[tokio::test]
    async fn test_read_frame_bad_preamble_is_protocol_error() {
        let (mut tx, rx) = tokio::io::duplex(256);
        let mut bytes = difficulty_frame();
        bytes[0] = 0x00;
        tx.write_all(&bytes).await.unwrap();

        let mut reader = FrameReader::new(rx, Origin::Server);
        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            ReadError::Frame(FrameError::InvalidPreamble { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_frame_client_origin_rejected_on_server_connection() {
        let (mut tx, rx) = tokio::io::duplex(256);
        tx.write_all(&frame_bytes(Origin::Client, 0x42, b""))
            .await
            .unwrap();

        let mut reader = FrameReader::new(rx, Origin::Server);
        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            ReadError::Frame(FrameError::UnexpectedOrigin { found: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_read_frame_eof_before_any_byte_is_connection_closed() {
        let (tx, rx) = tokio::io::duplex(256);
        drop(tx);

        let mut reader = FrameReader::new(rx, Origin::Server);
        assert!(matches!(
            reader.read_frame().await.unwrap_err(),
            ReadError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn test_read_frame_eof_mid_header_is_connection_closed() {
        let (mut tx, rx) = tokio::io::duplex(256);
        tx.write_all(&difficulty_frame()[..10]).await.unwrap();
        drop(tx);

        let mut reader = FrameReader::new(rx, Origin::Server);
        assert!(matches!(
            reader.read_frame().await.unwrap_err(),
            ReadError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn test_read_frame_eof_mid_payload_is_connection_closed() {
        let (mut tx, rx) = tokio::io::duplex(256);
        let bytes = difficulty_frame();
        tx.write_all(&bytes[..HEADER_SIZE + 3]).await.unwrap();
        drop(tx);

        let mut reader = FrameReader::new(rx, Origin::Server);
        assert!(matches!(
            reader.read_frame().await.unwrap_err(),
            ReadError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn test_read_frame_timeout_idle_stream_returns_none() {
        let (_tx, rx) = tokio::io::duplex(256);
        let mut reader = FrameReader::new(rx, Origin::Server);
        let result = reader
            .read_frame_timeout(Duration::from_millis(20))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_read_frame_timeout_delivers_pending_frame() {
        let (mut tx, rx) = tokio::io::duplex(256);
        tx.write_all(&difficulty_frame()).await.unwrap();

        let mut reader = FrameReader::new(rx, Origin::Server);
        let frame = reader
            .read_frame_timeout(Duration::from_secs(5))
            .await
            .unwrap()
            .expect("frame was already buffered");
        assert_eq!(frame.packet_type, PacketType::Difficulty as u32);
    }

    #[tokio::test]
    async fn test_read_frame_timeout_waits_out_slow_header() {
        // First byte is already buffered when the wait starts; the rest
        // arrives well after the window expires. The reader must block past
        // the window and still deliver a whole frame.
        let (mut tx, rx) = tokio::io::duplex(256);
        let bytes = difficulty_frame();
        tx.write_all(&bytes[..1]).await.unwrap();
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            tx.write_all(&bytes[1..]).await.unwrap();
        });

        let mut reader = FrameReader::new(rx, Origin::Server);
        let frame = reader
            .read_frame_timeout(Duration::from_millis(20))
            .await
            .unwrap()
            .expect("first byte arrived inside the window");
        writer.await.unwrap();
        assert_eq!(frame.payload.len(), 8);
    }

    #[tokio::test]
    async fn test_read_frame_timeout_eof_is_connection_closed() {
        let (tx, rx) = tokio::io::duplex(256);
        drop(tx);
        let mut reader = FrameReader::new(rx, Origin::Server);
        assert!(matches!(
            reader
                .read_frame_timeout(Duration::from_millis(20))
                .await
                .unwrap_err(),
            ReadError::ConnectionClosed
        ));
    }
}

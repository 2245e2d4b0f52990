//! Integration tests driving [`GameConnection`] against a scripted game
//! service on the loopback interface.
//!
//! The scripted server plays the role of the game's protocol port: it writes
//! pre-built frames, or garbage, and closes. The tests assert the probe-side
//! contract: dispatch until clean close, fail fast on protocol violations,
//! and emit correctly laid-out outbound frames.

use std::time::Duration;

use helm_core::protocol::header::{frame_bytes, FrameHeader, Origin, HEADER_SIZE, PREAMBLE};
use helm_core::protocol::packets::{DifficultyReport, GameVersion, PacketType};
use helm_core::{FrameError, PacketHandler};
use helm_probe::{GameConnection, ReadError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Default)]
struct RecordingHandler {
    difficulties: Vec<DifficultyReport>,
    versions: Vec<GameVersion>,
    welcomes: Vec<String>,
}

impl PacketHandler for RecordingHandler {
    fn handle_difficulty(&mut self, report: DifficultyReport) {
        self.difficulties.push(report);
    }

    fn handle_version(&mut self, version: GameVersion) {
        self.versions.push(version);
    }

    fn handle_welcome(&mut self, message: &str) {
        self.welcomes.push(message.to_string());
    }
}

fn difficulty_payload(difficulty: u32, game_type: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&difficulty.to_le_bytes());
    payload.extend_from_slice(&game_type.to_le_bytes());
    payload
}

#[tokio::test]
async fn test_probe_dispatches_frames_until_clean_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket
            .write_all(&frame_bytes(
                Origin::Server,
                PacketType::Welcome as u32,
                b"You have connected",
            ))
            .await
            .unwrap();
        socket
            .write_all(&frame_bytes(
                Origin::Server,
                PacketType::Difficulty as u32,
                &difficulty_payload(5, 2),
            ))
            .await
            .unwrap();
        // Unknown type in the middle of the stream must be tolerated.
        socket
            .write_all(&frame_bytes(Origin::Server, 0x0BAD_CAFE, &[1, 2, 3]))
            .await
            .unwrap();
        // Dropping the socket closes the connection cleanly.
    });

    let mut connection = GameConnection::connect(addr).await.unwrap();
    let mut handler = RecordingHandler::default();
    connection.run_until_closed(&mut handler).await.unwrap();
    server.await.unwrap();

    assert_eq!(handler.welcomes, vec!["You have connected".to_string()]);
    assert_eq!(
        handler.difficulties,
        vec![DifficultyReport {
            difficulty: 5,
            game_type: 2
        }]
    );
    assert!(handler.versions.is_empty());
}

#[tokio::test]
async fn test_probe_treats_bad_preamble_as_fatal() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut bytes = frame_bytes(Origin::Server, PacketType::Welcome as u32, b"hi");
        bytes[0] ^= 0xFF;
        socket.write_all(&bytes).await.unwrap();
        // Keep the socket open; the error must come from validation,
        // not from the close.
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let mut connection = GameConnection::connect(addr).await.unwrap();
    let mut handler = RecordingHandler::default();
    let err = connection.run_until_closed(&mut handler).await.unwrap_err();
    assert!(matches!(
        err,
        ReadError::Frame(FrameError::InvalidPreamble { .. })
    ));
    server.abort();
}

#[tokio::test]
async fn test_send_frame_emits_client_header_layout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut bytes = vec![0u8; HEADER_SIZE + 4];
        socket.read_exact(&mut bytes).await.unwrap();
        bytes
    });

    let mut connection = GameConnection::connect(addr).await.unwrap();
    connection.send_frame(0x77, b"abcd").await.unwrap();

    let bytes = server.await.unwrap();
    let header = FrameHeader::decode(bytes[..HEADER_SIZE].try_into().unwrap());
    assert_eq!(header.preamble, PREAMBLE);
    assert_eq!(header.length, 28);
    assert_eq!(header.origin, Origin::Client as u32);
    assert_eq!(header.padding, 0);
    assert_eq!(header.remaining, 8);
    assert_eq!(header.packet_type, 0x77);
    assert_eq!(&bytes[HEADER_SIZE..], b"abcd");
}

#[tokio::test]
async fn test_next_frame_timeout_on_silent_server_returns_none() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        // Say nothing; just hold the connection open.
        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(socket);
    });

    let mut connection = GameConnection::connect(addr).await.unwrap();
    let polled = connection
        .next_frame_timeout(Duration::from_millis(30))
        .await
        .unwrap();
    assert!(polled.is_none());
    server.abort();
}

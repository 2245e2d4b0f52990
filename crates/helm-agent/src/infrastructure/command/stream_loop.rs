//! Single-stream command loop.
//!
//! The same line protocol as the TCP server, over exactly one reader/writer
//! pair — the shape a serial port or a stdio pipe presents. The CLI wires
//! this to stdin/stdout in `--stdio` mode; an external bridge (e.g. socat to
//! a serial device) supplies the transport.

use std::io;

use helm_core::command::CommandBuffer;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::application::control::GameActions;
use crate::infrastructure::command::{respond_to_line, READ_CHUNK};

/// Reads newline-delimited commands from `reader` and writes one reply per
/// line to `writer` until the stream ends.
///
/// Dispatch is identical to the TCP server's: the action runs to completion
/// before the next read.
///
/// # Errors
///
/// Returns the underlying I/O error if reading or writing fails; a clean
/// end-of-stream returns `Ok(())`.
pub async fn run_command_loop<R, W, A>(
    mut reader: R,
    mut writer: W,
    actions: &mut A,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    A: GameActions,
{
    let mut buffer = CommandBuffer::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let received = reader.read(&mut chunk).await?;
        if received == 0 {
            info!("command stream ended");
            return Ok(());
        }

        for line in buffer.push_chunk(&chunk[..received]) {
            debug!("received command {:?}", String::from_utf8_lossy(&line));
            let reply = respond_to_line(&line, actions);
            writer.write_all(reply).await?;
            writer.flush().await?;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

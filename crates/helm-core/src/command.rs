//! Text command protocol: keywords, canned replies, and line framing.
//!
//! Controllers speak newline-terminated ASCII lines. A line is trimmed of
//! leading/trailing whitespace and matched case-insensitively against the
//! recognized keywords; every line gets exactly one canned reply. The same
//! grammar is consumed by the multi-client TCP server and by the
//! single-stream command loop.

use thiserror::Error;

/// Banner written to every controller immediately after it connects.
pub const GREETING: &[u8] = b"Hello\n";

/// Reply to a recognized command.
pub const REPLY_OK: &[u8] = b"Ok\n";

/// Reply to anything that is not a recognized command.
pub const REPLY_UNKNOWN: &[u8] = b"Unknown_Cmd\n";

/// Default TCP port of the command server.
pub const DEFAULT_COMMAND_PORT: u16 = 5123;

/// Recognized control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pause the game through the action interface.
    Pause,
}

/// A line that matched no recognized keyword. Carries the trimmed line text
/// (lossily decoded) for logging.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command {0:?}")]
pub struct UnknownCommand(pub String);

/// Parses one command line: trims ASCII whitespace, then compares
/// case-insensitively against the recognized keywords.
///
/// # Errors
///
/// Returns [`UnknownCommand`] for empty lines and unrecognized keywords;
/// the caller answers those with [`REPLY_UNKNOWN`].
pub fn parse_command(raw: &[u8]) -> Result<Command, UnknownCommand> {
    let line = trim_ascii(raw);
    if line.eq_ignore_ascii_case(b"pause") {
        Ok(Command::Pause)
    } else {
        Err(UnknownCommand(String::from_utf8_lossy(line).into_owned()))
    }
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

// ── Line framing ──────────────────────────────────────────────────────────────

/// Per-connection receive buffer for the text protocol.
///
/// Holds at most one incomplete command: every complete line in an arriving
/// chunk is returned immediately, and only the unterminated tail (possibly
/// empty) stays buffered for the next chunk.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pending: Vec<u8>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a received chunk and splits off every complete line.
    ///
    /// Returned lines do not include their terminating newline and are not
    /// yet trimmed; [`parse_command`] does the trimming.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop(); // the newline itself
            lines.push(line);
        }
        lines
    }

    /// The unterminated tail waiting for more bytes.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

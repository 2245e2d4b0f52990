//! Command transports.
//!
//! The multi-client TCP server and the single-stream loop speak the same
//! text protocol, so line dispatch lives here once and the server adds only
//! the session-multiplexing layer on top.

use helm_core::command::{parse_command, Command, REPLY_OK, REPLY_UNKNOWN};
use tracing::{error, warn};

use crate::application::control::GameActions;

pub mod server;
pub mod stream_loop;

pub use server::CommandServer;
pub use stream_loop::run_command_loop;

/// Read size for one pass over a ready transport.
pub(crate) const READ_CHUNK: usize = 4096;

/// Dispatches one received line and picks the reply to send back.
///
/// A recognized command whose action fails host-side is still answered with
/// [`REPLY_OK`]: the command itself was accepted, and the failure is logged
/// here rather than surfaced to the controller.
pub(crate) fn respond_to_line<A: GameActions>(line: &[u8], actions: &mut A) -> &'static [u8] {
    match parse_command(line) {
        Ok(Command::Pause) => {
            if let Err(e) = actions.pause() {
                error!("pause action failed: {e}");
            }
            REPLY_OK
        }
        Err(unknown) => {
            warn!("{unknown}");
            REPLY_UNKNOWN
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

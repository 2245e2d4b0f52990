//! Packet handler that logs decoded traffic.

use helm_core::protocol::packets::{DifficultyReport, GameVersion};
use helm_core::PacketHandler;
use tracing::info;

/// Logs every decoded packet at `info` level. This is the whole job of the
/// probe binary: show what the game service is saying.
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl PacketHandler for LoggingHandler {
    fn handle_difficulty(&mut self, report: DifficultyReport) {
        info!(
            difficulty = report.difficulty,
            game_type = report.game_type,
            "difficulty packet"
        );
    }

    fn handle_version(&mut self, version: GameVersion) {
        info!(
            "version packet: {}.{}.{}",
            version.major, version.minor, version.patch
        );
    }

    fn handle_welcome(&mut self, message: &str) {
        info!(message, "welcome packet");
    }
}

//! helm-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! The *agent* runs next to the game and listens for control triggers. When a
//! controller (a TCP client, or whatever is wired to the single-stream loop)
//! sends the `pause` command, the agent replays the pause sequence into the
//! game as real system input — ESC, a click on the pause button, ESC again —
//! as if an operator were sitting at the machine.
//!
//! Layers follow the application/infrastructure split:
//!
//! - [`application`] – the action interface (`pause`, `screenshot`), the
//!   platform-agnostic input-synthesis trait, and the pause-sequence use case.
//! - [`infrastructure`] – per-OS input synthesis, the command transports
//!   (multi-client TCP server, single-stream loop), and TOML configuration.

/// Application layer: use cases and the platform seams.
pub mod application;

/// Infrastructure layer: OS adapters, command transports, and storage.
pub mod infrastructure;

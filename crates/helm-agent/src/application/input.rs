//! Platform-agnostic input synthesis trait.
//!
//! Each supported OS provides an implementation in the infrastructure layer;
//! the pause use case only ever talks to this trait, so the protocol code
//! never touches an OS API.

use thiserror::Error;

/// Keys the control sequences can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// A printable ASCII digit or letter, pressed as its main-row key.
    Ascii(char),
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Middle,
}

/// Error type for input synthesis operations.
#[derive(Debug, Error)]
pub enum InputError {
    /// The OS rejected or failed the injection call.
    #[error("platform error: {0}")]
    Platform(String),

    /// The key has no native code on this platform.
    #[error("key {0:?} has no mapping on this platform")]
    UnmappedKey(Key),
}

/// Platform-agnostic input synthesis.
///
/// Cursor coordinates use the normalized screen space `[0, 65535]` on both
/// axes, where `(0, 0)` is the top-left and `(65535, 65535)` the bottom-right
/// corner of the screen.
pub trait InputSynthesizer: Send + Sync {
    /// Presses a key (key-down event).
    fn key_down(&self, key: Key) -> Result<(), InputError>;

    /// Releases a key (key-up event).
    fn key_up(&self, key: Key) -> Result<(), InputError>;

    /// Moves the cursor to an absolute normalized position.
    fn move_cursor(&self, x: u16, y: u16) -> Result<(), InputError>;

    /// Presses a mouse button.
    fn button_down(&self, button: Button) -> Result<(), InputError>;

    /// Releases a mouse button.
    fn button_up(&self, button: Button) -> Result<(), InputError>;
}

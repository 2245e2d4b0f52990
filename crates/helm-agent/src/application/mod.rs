//! Application layer: the action interface and its platform seams.

pub mod control;
pub mod input;

pub use control::{ActionError, GameActions, GameControl, PauseSettings, ScreenCapturer};
pub use input::{Button, InputError, InputSynthesizer, Key};

//! The action interface and the pause-sequence use case.
//!
//! [`GameActions`] is the narrow surface the command transports invoke; they
//! never see input synthesis or screen capture directly. [`GameControl`] is
//! the one production implementation: it replays the pause sequence through
//! an [`InputSynthesizer`], optionally capturing the screen right before the
//! click step.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::input::{Button, InputError, InputSynthesizer, Key};

/// Error type for control actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Input injection failed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Screen capture failed.
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// A capture was requested but no capturer is configured.
    #[error("no screen capturer is configured")]
    NoCapturer,
}

/// The capability set the command transports invoke.
///
/// Implementations may block: the single command loop owns the instance
/// exclusively, so an action always runs to completion before the next
/// command is read. Only one control action is ever in flight.
pub trait GameActions: Send {
    /// Pauses the game.
    fn pause(&mut self) -> Result<(), ActionError>;

    /// Captures the screen.
    fn screenshot(&mut self) -> Result<(), ActionError>;
}

/// Screen capture seam.
///
/// Implementations own their capture sequence number as explicit state;
/// there are no module-level counters.
pub trait ScreenCapturer: Send {
    fn capture(&mut self) -> Result<(), ActionError>;
}

/// Timing and geometry of the pause sequence.
#[derive(Debug, Clone)]
pub struct PauseSettings {
    /// Pause button position in normalized screen coordinates.
    pub button_x: u16,
    pub button_y: u16,
    /// Delay between individual synthesized input events.
    pub event_delay: Duration,
    /// Delay between the steps of the pause sequence.
    pub step_delay: Duration,
    /// Capture the screen just before the click step.
    pub screenshot_before_click: bool,
}

impl Default for PauseSettings {
    fn default() -> Self {
        Self {
            button_x: 6143,
            button_y: 6675,
            event_delay: Duration::from_millis(1),
            step_delay: Duration::from_millis(20),
            screenshot_before_click: false,
        }
    }
}

/// The production [`GameActions`] implementation.
pub struct GameControl {
    input: Arc<dyn InputSynthesizer>,
    capturer: Option<Box<dyn ScreenCapturer>>,
    settings: PauseSettings,
}

impl GameControl {
    /// Creates a control instance with no screen capturer.
    pub fn new(input: Arc<dyn InputSynthesizer>, settings: PauseSettings) -> Self {
        Self {
            input,
            capturer: None,
            settings,
        }
    }

    /// Attaches a screen capturer.
    pub fn with_capturer(mut self, capturer: Box<dyn ScreenCapturer>) -> Self {
        self.capturer = Some(capturer);
        self
    }

    /// Taps a key: press, short pacing delay, release.
    fn tap_key(&self, key: Key) -> Result<(), ActionError> {
        self.pace();
        self.input.key_down(key)?;
        self.pace();
        self.input.key_up(key)?;
        Ok(())
    }

    /// Moves to the position and clicks the left button.
    fn click(&self, x: u16, y: u16) -> Result<(), ActionError> {
        self.pace();
        self.input.move_cursor(x, y)?;
        self.pace();
        self.input.button_down(Button::Left)?;
        self.pace();
        self.input.button_up(Button::Left)?;
        Ok(())
    }

    /// Pacing delay between raw input events.
    fn pace(&self) {
        if !self.settings.event_delay.is_zero() {
            std::thread::sleep(self.settings.event_delay);
        }
    }

    /// Settling delay between sequence steps, giving the game UI time to
    /// react before the next step lands.
    fn settle(&self) {
        if !self.settings.step_delay.is_zero() {
            std::thread::sleep(self.settings.step_delay);
        }
    }
}

impl GameActions for GameControl {
    /// Runs the full pause sequence: ESC to open the menu, an optional screen
    /// capture, a click on the pause button, then ESC to close the menu.
    ///
    /// Blocks the calling loop for the whole sequence.
    fn pause(&mut self) -> Result<(), ActionError> {
        info!("running pause sequence");

        self.tap_key(Key::Escape)?;
        self.settle();

        if self.settings.screenshot_before_click {
            // A failed capture must not abort the pause itself.
            if let Err(e) = self.screenshot() {
                warn!("screen capture before pause click failed: {e}");
            }
        }

        self.click(self.settings.button_x, self.settings.button_y)?;
        self.settle();

        self.tap_key(Key::Escape)?;
        self.settle();

        Ok(())
    }

    fn screenshot(&mut self) -> Result<(), ActionError> {
        match self.capturer.as_mut() {
            Some(capturer) => capturer.capture(),
            None => Err(ActionError::NoCapturer),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Input and capture mocks sharing one log, so tests can assert the
    /// relative order of every step in the sequence.
    type Log = Arc<Mutex<Vec<String>>>;

    struct LoggingInput {
        log: Log,
        fail_moves: bool,
    }

    impl InputSynthesizer for LoggingInput {
        fn key_down(&self, key: Key) -> Result<(), InputError> {
            self.log.lock().unwrap().push(format!("key_down {key:?}"));
            Ok(())
        }

        fn key_up(&self, key: Key) -> Result<(), InputError> {
            self.log.lock().unwrap().push(format!("key_up {key:?}"));
            Ok(())
        }

        fn move_cursor(&self, x: u16, y: u16) -> Result<(), InputError> {
            if self.fail_moves {
                return Err(InputError::Platform("injected failure".to_string()));
            }
            self.log.lock().unwrap().push(format!("move {x} {y}"));
            Ok(())
        }

        fn button_down(&self, button: Button) -> Result<(), InputError> {
            self.log.lock().unwrap().push(format!("button_down {button:?}"));
            Ok(())
        }

        fn button_up(&self, button: Button) -> Result<(), InputError> {
            self.log.lock().unwrap().push(format!("button_up {button:?}"));
            Ok(())
        }
    }

    struct LoggingCapturer {
        log: Log,
    }

    impl ScreenCapturer for LoggingCapturer {
        fn capture(&mut self) -> Result<(), ActionError> {
            self.log.lock().unwrap().push("capture".to_string());
            Ok(())
        }
    }

    fn fast_settings() -> PauseSettings {
        PauseSettings {
            event_delay: Duration::ZERO,
            step_delay: Duration::ZERO,
            ..PauseSettings::default()
        }
    }

    fn logged(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_pause_replays_full_sequence_in_order() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let input = Arc::new(LoggingInput {
            log: Arc::clone(&log),
            fail_moves: false,
        });
        let mut control = GameControl::new(input, fast_settings());

        control.pause().unwrap();

        assert_eq!(
            logged(&log),
            vec![
                "key_down Escape",
                "key_up Escape",
                "move 6143 6675",
                "button_down Left",
                "button_up Left",
                "key_down Escape",
                "key_up Escape",
            ]
        );
    }

    #[test]
    fn test_pause_captures_before_the_click_step_when_configured() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let input = Arc::new(LoggingInput {
            log: Arc::clone(&log),
            fail_moves: false,
        });
        let settings = PauseSettings {
            screenshot_before_click: true,
            ..fast_settings()
        };
        let mut control = GameControl::new(input, settings)
            .with_capturer(Box::new(LoggingCapturer {
                log: Arc::clone(&log),
            }));

        control.pause().unwrap();

        let events = logged(&log);
        let capture_at = events.iter().position(|e| e == "capture").unwrap();
        let move_at = events.iter().position(|e| e.starts_with("move")).unwrap();
        assert!(
            capture_at < move_at,
            "capture must land before the click step: {events:?}"
        );
    }

    #[test]
    fn test_pause_without_capturer_still_succeeds_when_capture_requested() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let input = Arc::new(LoggingInput {
            log: Arc::clone(&log),
            fail_moves: false,
        });
        let settings = PauseSettings {
            screenshot_before_click: true,
            ..fast_settings()
        };
        let mut control = GameControl::new(input, settings);

        control.pause().unwrap();
        assert_eq!(logged(&log).len(), 7, "the input sequence must run in full");
    }

    #[test]
    fn test_pause_propagates_input_failure() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let input = Arc::new(LoggingInput {
            log: Arc::clone(&log),
            fail_moves: true,
        });
        let mut control = GameControl::new(input, fast_settings());

        let err = control.pause().unwrap_err();
        assert!(matches!(err, ActionError::Input(InputError::Platform(_))));
    }

    #[test]
    fn test_screenshot_without_capturer_is_an_error() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let input = Arc::new(LoggingInput {
            log,
            fail_moves: false,
        });
        let mut control = GameControl::new(input, fast_settings());

        assert!(matches!(
            control.screenshot().unwrap_err(),
            ActionError::NoCapturer
        ));
    }

    #[test]
    fn test_pause_uses_configured_button_position() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let input = Arc::new(LoggingInput {
            log: Arc::clone(&log),
            fail_moves: false,
        });
        let settings = PauseSettings {
            button_x: 100,
            button_y: 200,
            ..fast_settings()
        };
        let mut control = GameControl::new(input, settings);

        control.pause().unwrap();
        assert!(logged(&log).contains(&"move 100 200".to_string()));
    }
}

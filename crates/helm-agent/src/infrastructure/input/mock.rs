//! Mock input synthesizer for unit and integration testing.
//!
//! The real synthesizer injects OS input events: it needs a desktop session
//! to run and actually moves the cursor and presses keys on the machine, and
//! none of that can be observed from test code. The mock records every call
//! into an in-memory log instead, in call order, so tests can assert exactly
//! what a control sequence emitted.
//!
//! Set `should_fail` to exercise error-handling paths in callers without a
//! broken OS.

use std::sync::Mutex;

use crate::application::input::{Button, InputError, InputSynthesizer, Key};

/// One recorded synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesizedEvent {
    KeyDown(Key),
    KeyUp(Key),
    MoveCursor(u16, u16),
    ButtonDown(Button),
    ButtonUp(Button),
}

/// A synthesizer that records all calls without touching any OS API.
///
/// Events are stored behind a `Mutex` so the mock can be shared through an
/// `Arc` exactly like the real implementation.
#[derive(Default)]
pub struct MockInputSynthesizer {
    /// Every call, in the order it was made.
    pub events: Mutex<Vec<SynthesizedEvent>>,
    /// When `true`, every method immediately returns [`InputError::Platform`].
    pub should_fail: bool,
}

impl MockInputSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn recorded(&self) -> Vec<SynthesizedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: SynthesizedEvent) -> Result<(), InputError> {
        if self.should_fail {
            return Err(InputError::Platform("mock failure".into()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl InputSynthesizer for MockInputSynthesizer {
    fn key_down(&self, key: Key) -> Result<(), InputError> {
        self.record(SynthesizedEvent::KeyDown(key))
    }

    fn key_up(&self, key: Key) -> Result<(), InputError> {
        self.record(SynthesizedEvent::KeyUp(key))
    }

    fn move_cursor(&self, x: u16, y: u16) -> Result<(), InputError> {
        self.record(SynthesizedEvent::MoveCursor(x, y))
    }

    fn button_down(&self, button: Button) -> Result<(), InputError> {
        self.record(SynthesizedEvent::ButtonDown(button))
    }

    fn button_up(&self, button: Button) -> Result<(), InputError> {
        self.record(SynthesizedEvent::ButtonUp(button))
    }
}

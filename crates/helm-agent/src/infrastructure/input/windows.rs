//! Windows input synthesis via the SendInput API.
//!
//! Cursor positions arrive already normalized to the Windows virtual screen
//! space `[0, 65535]`, so moves map directly onto
//! `MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE` with no metric lookups.

#![cfg(target_os = "windows")]

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN,
    MOUSEEVENTF_RIGHTUP, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY, VK_ESCAPE,
};

use crate::application::input::{Button, InputError, InputSynthesizer, Key};

/// Windows implementation of [`InputSynthesizer`] using SendInput.
pub struct WindowsInputSynthesizer;

impl WindowsInputSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInputSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSynthesizer for WindowsInputSynthesizer {
    fn key_down(&self, key: Key) -> Result<(), InputError> {
        send_key(virtual_key(key)?, false)
    }

    fn key_up(&self, key: Key) -> Result<(), InputError> {
        send_key(virtual_key(key)?, true)
    }

    fn move_cursor(&self, x: u16, y: u16) -> Result<(), InputError> {
        send_mouse(
            MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE,
            i32::from(x),
            i32::from(y),
        )
    }

    fn button_down(&self, button: Button) -> Result<(), InputError> {
        let flags = match button {
            Button::Left => MOUSEEVENTF_LEFTDOWN,
            Button::Right => MOUSEEVENTF_RIGHTDOWN,
            Button::Middle => MOUSEEVENTF_MIDDLEDOWN,
        };
        send_mouse(flags, 0, 0)
    }

    fn button_up(&self, button: Button) -> Result<(), InputError> {
        let flags = match button {
            Button::Left => MOUSEEVENTF_LEFTUP,
            Button::Right => MOUSEEVENTF_RIGHTUP,
            Button::Middle => MOUSEEVENTF_MIDDLEUP,
        };
        send_mouse(flags, 0, 0)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Translates a [`Key`] to a Windows Virtual Key code.
fn virtual_key(key: Key) -> Result<VIRTUAL_KEY, InputError> {
    match key {
        Key::Escape => Ok(VK_ESCAPE),
        // Digits and letters share their codes with ASCII upper case.
        Key::Ascii(c) if c.is_ascii_alphanumeric() => {
            Ok(VIRTUAL_KEY(c.to_ascii_uppercase() as u16))
        }
        Key::Ascii(_) => Err(InputError::UnmappedKey(key)),
    }
}

fn send_key(vk: VIRTUAL_KEY, key_up: bool) -> Result<(), InputError> {
    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: if key_up {
                    KEYEVENTF_KEYUP
                } else {
                    KEYBD_EVENT_FLAGS(0)
                },
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    dispatch(input)
}

fn send_mouse(flags: MOUSE_EVENT_FLAGS, dx: i32, dy: i32) -> Result<(), InputError> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    dispatch(input)
}

fn dispatch(input: INPUT) -> Result<(), InputError> {
    // SAFETY: input is a valid INPUT structure on the stack
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent != 1 {
        return Err(InputError::Platform(
            "SendInput rejected the event".to_string(),
        ));
    }
    Ok(())
}

//! Win32 implementation of the platform traits
//!
//! Cursor moves use `SetCursorPos`, which is synchronous: the position is
//! in effect when the call returns, so a click injected right after lands
//! on the new spot. Button transitions go through `SendInput` one event at
//! a time so the caller controls the hold between down and up.

use std::mem;

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEINPUT,
    MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use super::{ButtonState, KeyboardState, MouseButton, PlatformError, PointerDevice, WindowProbe};
use crate::domain::core::Point;
use crate::domain::hotkeys::VirtualKey;

/// High bit of `GetAsyncKeyState`: key is currently down
const KEY_DOWN_MASK: u16 = 0x8000;

/// The real desktop: system cursor, mouse, keyboard, and window manager
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Desktop;

impl Win32Desktop {
    pub fn new() -> Self {
        Self
    }

    fn button_flags(button: MouseButton, state: ButtonState) -> MOUSE_EVENT_FLAGS {
        match (button, state) {
            (MouseButton::Left, ButtonState::Down) => MOUSEEVENTF_LEFTDOWN,
            (MouseButton::Left, ButtonState::Up) => MOUSEEVENTF_LEFTUP,
            (MouseButton::Right, ButtonState::Down) => MOUSEEVENTF_RIGHTDOWN,
            (MouseButton::Right, ButtonState::Up) => MOUSEEVENTF_RIGHTUP,
        }
    }
}

impl PointerDevice for Win32Desktop {
    fn cursor_position(&self) -> Result<Point, PlatformError> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.map_err(|_| PlatformError::CursorQueryFailed)?;
        Ok(Point::new(point.x, point.y))
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError> {
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|_| PlatformError::CursorMoveFailed(point))
    }

    fn send_button(&self, button: MouseButton, state: ButtonState) -> Result<(), PlatformError> {
        // Relative input with no movement: the event lands wherever the
        // cursor already is.
        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dwFlags: Self::button_flags(button, state),
                    ..Default::default()
                },
            },
        };

        let sent = unsafe { SendInput(&[input], mem::size_of::<INPUT>() as i32) };
        if sent != 1 {
            return Err(PlatformError::InjectionFailed { sent, expected: 1 });
        }

        Ok(())
    }
}

impl WindowProbe for Win32Desktop {
    fn foreground_title(&self) -> Option<String> {
        super::window::foreground_title()
    }
}

impl KeyboardState for Win32Desktop {
    fn is_key_down(&self, key: VirtualKey) -> bool {
        let state = unsafe { GetAsyncKeyState(key.code() as i32) };
        (state as u16) & KEY_DOWN_MASK != 0
    }
}

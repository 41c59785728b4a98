//! Platform boundary
//!
//! The automation core only ever talks to the OS through the three traits
//! defined here. `Win32Desktop` is the real implementation; tests supply
//! recording doubles. All Win32 API interactions live in the
//! `cfg(windows)` submodules.

use std::rc::Rc;
use std::sync::Arc;

use crate::domain::core::Point;
use crate::domain::hotkeys::VirtualKey;

#[cfg(windows)]
pub mod desktop;
#[cfg(windows)]
pub mod elevation;
#[cfg(windows)]
pub mod window;

#[cfg(windows)]
pub use desktop::Win32Desktop;

/// Errors raised by the OS boundary
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Failed to read cursor position")]
    CursorQueryFailed,

    #[error("Failed to move cursor to {0}")]
    CursorMoveFailed(Point),

    #[error("Input injection rejected: {sent} of {expected} events sent")]
    InjectionFailed { sent: u32, expected: u32 },

    #[error("Failed to relaunch with elevation: {0}")]
    ElevationFailed(String),
}

/// Mouse button used by a synthesized click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Half of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Down,
    Up,
}

/// System cursor and mouse button injection
pub trait PointerDevice {
    /// Current cursor position in screen coordinates
    fn cursor_position(&self) -> Result<Point, PlatformError>;

    /// Moves the cursor. Must take effect before the call returns.
    fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError>;

    /// Injects a single button transition at the current cursor position
    fn send_button(&self, button: MouseButton, state: ButtonState) -> Result<(), PlatformError>;
}

/// Foreground window inspection
pub trait WindowProbe {
    /// Title of the foreground window
    ///
    /// `None` when there is no foreground window; an untitled window
    /// yields `Some("")`.
    fn foreground_title(&self) -> Option<String>;
}

/// Instantaneous physical key state
pub trait KeyboardState {
    /// Whether the key is held down right now
    fn is_key_down(&self, key: VirtualKey) -> bool;
}

impl<T: PointerDevice + ?Sized> PointerDevice for Rc<T> {
    fn cursor_position(&self) -> Result<Point, PlatformError> {
        (**self).cursor_position()
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError> {
        (**self).set_cursor_position(point)
    }

    fn send_button(&self, button: MouseButton, state: ButtonState) -> Result<(), PlatformError> {
        (**self).send_button(button, state)
    }
}

impl<T: PointerDevice + ?Sized> PointerDevice for Arc<T> {
    fn cursor_position(&self) -> Result<Point, PlatformError> {
        (**self).cursor_position()
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError> {
        (**self).set_cursor_position(point)
    }

    fn send_button(&self, button: MouseButton, state: ButtonState) -> Result<(), PlatformError> {
        (**self).send_button(button, state)
    }
}

impl<T: WindowProbe + ?Sized> WindowProbe for Rc<T> {
    fn foreground_title(&self) -> Option<String> {
        (**self).foreground_title()
    }
}

impl<T: WindowProbe + ?Sized> WindowProbe for Arc<T> {
    fn foreground_title(&self) -> Option<String> {
        (**self).foreground_title()
    }
}

impl<T: KeyboardState + ?Sized> KeyboardState for Rc<T> {
    fn is_key_down(&self, key: VirtualKey) -> bool {
        (**self).is_key_down(key)
    }
}

impl<T: KeyboardState + ?Sized> KeyboardState for Arc<T> {
    fn is_key_down(&self, key: VirtualKey) -> bool {
        (**self).is_key_down(key)
    }
}

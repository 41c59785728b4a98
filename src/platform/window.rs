//! Foreground window queries
//!
//! Reads the handle and title of the window that currently has focus.
//! Only the title is needed to decide whether the game is in front.

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW,
};

/// Gets the currently active (foreground) window
///
/// # Returns
/// Handle to the foreground window, or `None` if no window is active
pub fn foreground_window() -> Option<HWND> {
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.0 == 0 { None } else { Some(hwnd) }
}

/// Reads a window's title text
///
/// Windows without a title (or whose title cannot be read) yield an
/// empty string rather than an error.
pub fn window_title(hwnd: HWND) -> String {
    let length = unsafe { GetWindowTextLengthW(hwnd) };
    if length <= 0 {
        return String::new();
    }

    // Room for the terminating NUL
    let mut buffer = vec![0u16; length as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    if copied <= 0 {
        return String::new();
    }

    String::from_utf16_lossy(&buffer[..copied as usize])
}

/// Title of the foreground window, if there is one
pub fn foreground_title() -> Option<String> {
    foreground_window().map(window_title)
}

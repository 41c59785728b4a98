//! Target window gating
//!
//! Hotkeys and per-cell sell clicks only act while the game window is in
//! the foreground. The check is a plain title substring match.

use crate::platform::WindowProbe;

/// Reports whether the target application is the foreground window
#[derive(Debug)]
pub struct FocusGate<W: WindowProbe> {
    probe: W,
    target: String,
}

impl<W: WindowProbe> FocusGate<W> {
    /// Creates a gate matching foreground titles that contain `target`
    pub fn new(probe: W, target: impl Into<String>) -> Self {
        Self {
            probe,
            target: target.into(),
        }
    }

    /// Title substring this gate looks for
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the foreground window's title contains the target name
    ///
    /// No foreground window or an untitled one simply counts as unfocused.
    pub fn is_target_focused(&self) -> bool {
        self.probe
            .foreground_title()
            .is_some_and(|title| title.contains(self.target.as_str()))
    }
}

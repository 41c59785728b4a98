//! Core domain types
//!
//! Pure value types shared by every layer. Nothing here knows about
//! Win32; screen coordinates are plain integers in virtual-desktop pixels.

use std::fmt;
use std::str::FromStr;

/// A point in screen coordinates
///
/// Produced by the grid mapper and by configuration, consumed by the
/// input injector. Has no identity beyond its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Error returned when a `"x, y"` pair cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected \"x, y\" integer pair, got {0:?}")]
pub struct ParsePointError(pub String);

impl FromStr for Point {
    type Err = ParsePointError;

    /// Parses the `"x, y"` form used by the configuration file.
    /// Whitespace around either component is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePointError(s.to_string());

        let mut parts = s.split(',');
        let x = parts.next().ok_or_else(err)?.trim().parse().map_err(|_| err())?;
        let y = parts.next().ok_or_else(err)?.trim().parse().map_err(|_| err())?;
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(Self::new(x, y))
    }
}

//! Domain logic and core data structures
//!
//! This module contains pure logic that is independent
//! of Win32 APIs and platform-specific implementations.

pub mod core;
pub mod grid;
pub mod hotkeys;

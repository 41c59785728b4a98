//! Hotkey-driven auto-sell and dismantle agent for Grim Dawn
//!
//! Polls a small set of function keys and, while the game window is in the
//! foreground, replays fixed mouse sequences over the inventory grid.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;

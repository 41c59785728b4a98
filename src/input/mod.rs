//! Input synthesis
//!
//! Clicks, cursor moves, and the scoped cursor restore used by the action
//! sequences.

pub mod injector;

pub use injector::{CursorGuard, InputInjector};

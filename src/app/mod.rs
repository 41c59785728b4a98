//! Automation engine
//!
//! Focus gating, the sell/dismantle sequences, and the hotkey loop that
//! drives them. Everything here is generic over the platform traits.

pub mod cancel;
pub mod dispatcher;
pub mod focus;
pub mod sequencer;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancelToken;
pub use dispatcher::{DispatchExit, HotkeyDispatcher, Tick};
pub use focus::FocusGate;
pub use sequencer::{ActionSequencer, SequenceError, SequenceOutcome, SequencePlan, StopReason};
pub use task::{DispatchError, DispatcherTask};

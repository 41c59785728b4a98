//! Hotkey polling loop
//!
//! A fixed-tick loop that samples physical key state. Each tick:
//!
//! 1. Global-exit key held → stop. This is checked before anything else,
//!    whether or not the game has focus.
//! 2. Game not focused → nothing else is evaluated this tick.
//! 3. The first held key in the action priority list runs its sequence
//!    synchronously; lower-priority keys are not looked at.
//!
//! There is no queue. A key pressed while a sequence runs is only seen on
//! the first tick after the sequence returns.

use std::thread;
use std::time::Duration;

use log::{debug, error, info};

use crate::app::sequencer::{ActionSequencer, SequenceOutcome, StopReason};
use crate::domain::hotkeys::{Action, HotkeyBindings, VirtualKey};
use crate::platform::{KeyboardState, PointerDevice, WindowProbe};

/// What a single poll did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Shutdown was already requested through the cancel token
    Cancelled,
    /// The global-exit key is held
    ExitRequested,
    /// The game is not in the foreground
    Unfocused,
    /// Focused, but no action key held
    Idle,
    /// An action sequence ran to its end or was interrupted
    Ran { action: Action, outcome: SequenceOutcome },
    /// An action sequence was aborted by a platform error
    Failed { action: Action },
}

/// Why the loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchExit {
    ExitKey,
    Cancelled,
}

impl From<StopReason> for DispatchExit {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::ExitKey => DispatchExit::ExitKey,
            StopReason::Cancelled => DispatchExit::Cancelled,
        }
    }
}

/// Polls hotkeys and runs the matching action sequence
pub struct HotkeyDispatcher<P: PointerDevice, W: WindowProbe, K: KeyboardState> {
    sequencer: ActionSequencer<P, W, K>,
    priority: Vec<(Action, VirtualKey)>,
    exit_key: Option<VirtualKey>,
    tick: Duration,
}

impl<P: PointerDevice, W: WindowProbe, K: KeyboardState> HotkeyDispatcher<P, W, K> {
    /// Poll interval
    pub const DEFAULT_TICK: Duration = Duration::from_millis(5);

    /// Creates a dispatcher over the bound actions of `bindings`
    pub fn new(sequencer: ActionSequencer<P, W, K>, bindings: &HotkeyBindings) -> Self {
        Self {
            sequencer,
            priority: bindings.priority_list(),
            exit_key: bindings.global_exit,
            tick: Self::DEFAULT_TICK,
        }
    }

    /// Overrides the poll interval
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn sequencer(&self) -> &ActionSequencer<P, W, K> {
        &self.sequencer
    }

    /// Bound actions in the order they are checked
    pub fn priority(&self) -> &[(Action, VirtualKey)] {
        &self.priority
    }

    /// Performs one poll without sleeping
    pub fn poll_once(&self) -> Tick {
        let cancel = self.sequencer.cancel_token();
        if cancel.is_cancelled() {
            return Tick::Cancelled;
        }

        let keys = self.sequencer.keys();
        if let Some(exit) = self.exit_key {
            if keys.is_key_down(exit) {
                info!("global exit key ({exit}) pressed, exiting");
                cancel.cancel();
                return Tick::ExitRequested;
            }
        }

        if !self.sequencer.focus().is_target_focused() {
            return Tick::Unfocused;
        }

        let Some(action) = self.pressed_action() else {
            return Tick::Idle;
        };

        info!("{action} triggered");
        match self.sequencer.run(action) {
            Ok(outcome) => {
                info!("{action} finished: {} slots processed", outcome.processed());
                Tick::Ran { action, outcome }
            }
            Err(e) => {
                error!("{action} aborted: {e}");
                Tick::Failed { action }
            }
        }
    }

    /// Polls until the exit key is pressed or the cancel token is set
    pub fn run(&self) -> DispatchExit {
        debug!(
            "polling {} hotkeys every {:?} while \"{}\" is focused",
            self.priority.len(),
            self.tick,
            self.sequencer.focus().target()
        );

        loop {
            match self.poll_once() {
                Tick::Cancelled => return DispatchExit::Cancelled,
                Tick::ExitRequested => return DispatchExit::ExitKey,
                Tick::Ran { outcome, .. } => {
                    if let Some(reason) = outcome.stop_reason() {
                        return reason.into();
                    }
                }
                Tick::Unfocused | Tick::Idle | Tick::Failed { .. } => {}
            }

            thread::sleep(self.tick);
        }
    }

    /// First held key in priority order
    fn pressed_action(&self) -> Option<Action> {
        let keys = self.sequencer.keys();
        self.priority
            .iter()
            .find(|(_, key)| keys.is_key_down(*key))
            .map(|&(action, _)| action)
    }
}

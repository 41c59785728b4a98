//! Sell and dismantle action sequences
//!
//! Both sequences walk a list of inventory slots in grid order while holding
//! the user's cursor through a [`CursorGuard`](crate::input::CursorGuard).
//! Between steps they check for a stop request: the shared cancel token, or
//! the global-exit key held down. A stop returns early; the guard then puts
//! the cursor back. Any UI state the game was left in (an open panel, a
//! selected item) is not undone.
//!
//! Sell re-checks focus per slot and skips slots while the game is in the
//! background. Dismantle does not: once started, every slot goes through
//! all six clicks.

use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::app::cancel::CancelToken;
use crate::app::focus::FocusGate;
use crate::config::{ActionPoints, AppConfig, Delays};
use crate::domain::core::Point;
use crate::domain::grid::{self, GridSpec};
use crate::domain::hotkeys::{Action, VirtualKey};
use crate::input::InputInjector;
use crate::platform::{KeyboardState, PlatformError, PointerDevice, WindowProbe};

/// Errors that abort an action sequence
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("input injection failed: {0}")]
    Platform(#[from] PlatformError),
}

/// Why a sequence stopped before its last slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The global-exit key was held at a step boundary
    ExitKey,
    /// The shared cancel token was set elsewhere (tray exit, task stop)
    Cancelled,
}

/// Result of a sequence that ran without platform errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Every slot was visited. `processed` counts slots acted on; sell
    /// skips slots while unfocused, so it can be lower than the slot count.
    Completed { processed: usize },
    /// Stopped early after fully processing `processed` slots
    Interrupted { processed: usize, reason: StopReason },
}

impl SequenceOutcome {
    pub fn processed(&self) -> usize {
        match *self {
            SequenceOutcome::Completed { processed } => processed,
            SequenceOutcome::Interrupted { processed, .. } => processed,
        }
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match *self {
            SequenceOutcome::Completed { .. } => None,
            SequenceOutcome::Interrupted { reason, .. } => Some(reason),
        }
    }
}

/// Everything the sequences need from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencePlan {
    pub main_grid: GridSpec,
    pub secondary_grid: GridSpec,
    pub points: ActionPoints,
    pub delays: Delays,
    /// Dismantle a single slot and stop, for checking coordinates
    pub diagnostic: bool,
}

impl SequencePlan {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            main_grid: config.main_grid,
            secondary_grid: config.secondary_grid,
            points: config.points,
            delays: config.delays,
            diagnostic: config.debug,
        }
    }

    /// Main grid slots followed by secondary grid slots
    pub fn all_cells(&self) -> Vec<Point> {
        grid::concat(&self.main_grid, &self.secondary_grid)
    }

    pub fn secondary_cells(&self) -> Vec<Point> {
        grid::generate(&self.secondary_grid)
    }
}

/// Runs sell and dismantle sequences against the desktop
pub struct ActionSequencer<P: PointerDevice, W: WindowProbe, K: KeyboardState> {
    injector: InputInjector<P>,
    focus: FocusGate<W>,
    keys: K,
    exit_key: Option<VirtualKey>,
    plan: SequencePlan,
    cancel: CancelToken,
}

impl<P: PointerDevice, W: WindowProbe, K: KeyboardState> ActionSequencer<P, W, K> {
    /// Creates a sequencer
    ///
    /// # Arguments
    /// * `injector` - Click and cursor primitives
    /// * `focus` - Target window gate, consulted per slot by sell
    /// * `keys` - Key state source for the global-exit check
    /// * `exit_key` - Global-exit key; `None` disables the key check
    /// * `plan` - Grids, fixed points, delays and diagnostic flag
    /// * `cancel` - Shared stop flag
    pub fn new(
        injector: InputInjector<P>,
        focus: FocusGate<W>,
        keys: K,
        exit_key: Option<VirtualKey>,
        plan: SequencePlan,
        cancel: CancelToken,
    ) -> Self {
        Self {
            injector,
            focus,
            keys,
            exit_key,
            plan,
            cancel,
        }
    }

    pub fn focus(&self) -> &FocusGate<W> {
        &self.focus
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Runs the sequence bound to `action`
    pub fn run(&self, action: Action) -> Result<SequenceOutcome, SequenceError> {
        match action {
            Action::SellAll => self.sell_all(),
            Action::SellSecondary => self.sell_secondary(),
            Action::DismantleAll => self.dismantle_all(),
            Action::DismantleSecondary => self.dismantle_secondary(),
        }
    }

    pub fn sell_all(&self) -> Result<SequenceOutcome, SequenceError> {
        self.sell(&self.plan.all_cells())
    }

    pub fn sell_secondary(&self) -> Result<SequenceOutcome, SequenceError> {
        self.sell(&self.plan.secondary_cells())
    }

    pub fn dismantle_all(&self) -> Result<SequenceOutcome, SequenceError> {
        self.dismantle(&self.plan.all_cells())
    }

    pub fn dismantle_secondary(&self) -> Result<SequenceOutcome, SequenceError> {
        self.dismantle(&self.plan.secondary_cells())
    }

    /// Right-clicks every slot, skipping slots while the game is unfocused
    pub fn sell(&self, cells: &[Point]) -> Result<SequenceOutcome, SequenceError> {
        let _cursor = self.injector.hold_cursor()?;
        let total = cells.len();
        let mut processed = 0;

        info!("selling {total} slots");

        for (index, &cell) in cells.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(interrupted(processed, StopReason::Cancelled));
            }

            if !self.focus.is_target_focused() {
                continue;
            }

            debug!("Selling: clicking cell {}/{total} at {cell}", index + 1);
            self.injector.right_click_at(cell)?;
            processed += 1;

            if let Some(reason) = self.stop_requested() {
                return Ok(interrupted(processed, reason));
            }

            self.pause(self.plan.delays.action);
        }

        Ok(SequenceOutcome::Completed { processed })
    }

    /// Runs the six-click dismantle flow on every slot
    ///
    /// In diagnostic mode only the first slot is processed.
    pub fn dismantle(&self, cells: &[Point]) -> Result<SequenceOutcome, SequenceError> {
        let _cursor = self.injector.hold_cursor()?;
        let total = cells.len();
        let points = self.plan.points;
        let delays = self.plan.delays;
        let mut processed = 0;

        info!("dismantling {total} slots");

        for (index, &cell) in cells.iter().enumerate() {
            debug!("Dismantling: processing cell {}/{total} at {cell}", index + 1);

            let steps = [
                (points.transmute_tab, delays.panel_open),
                (points.dismantle_tab, delays.panel_open),
                (cell, delays.action),
                (points.dismantle_item, delays.action),
                (points.dismantle_button, delays.action),
                (points.confirm_dismantle, delays.action),
            ];

            for (target, delay) in steps {
                if let Some(reason) = self.stop_requested() {
                    return Ok(interrupted(processed, reason));
                }
                self.injector.left_click_at(target)?;
                self.pause(delay);
            }
            processed += 1;

            if self.plan.diagnostic {
                debug!("diagnostic mode: stopping after one cell");
                break;
            }
        }

        Ok(SequenceOutcome::Completed { processed })
    }

    /// Checks the cancel token, then the global-exit key
    ///
    /// A held exit key also sets the token so the dispatcher and tray stop.
    fn stop_requested(&self) -> Option<StopReason> {
        if self.cancel.is_cancelled() {
            return Some(StopReason::Cancelled);
        }

        if let Some(key) = self.exit_key {
            if self.keys.is_key_down(key) {
                info!("global exit key ({key}) pressed, stopping");
                self.cancel.cancel();
                return Some(StopReason::ExitKey);
            }
        }

        None
    }

    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

fn interrupted(processed: usize, reason: StopReason) -> SequenceOutcome {
    info!("sequence interrupted after {processed} slots ({reason:?})");
    SequenceOutcome::Interrupted { processed, reason }
}

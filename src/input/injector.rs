//! Synthetic mouse input
//!
//! `InputInjector` turns the raw button transitions of a `PointerDevice`
//! into discrete clicks, and `CursorGuard` gives the action sequences a
//! scoped hold on the user's pointer: the position captured on entry is put
//! back when the guard drops, whichever way the sequence ends.

use std::thread;
use std::time::Duration;

use log::{trace, warn};

use crate::domain::core::Point;
use crate::platform::{ButtonState, MouseButton, PlatformError, PointerDevice};

/// Injects clicks and cursor moves through a pointer device
///
/// Every call is synchronous. There is no queueing or batching; a click
/// blocks only for its hold time.
#[derive(Debug)]
pub struct InputInjector<P: PointerDevice> {
    device: P,
    click_hold: Duration,
}

impl<P: PointerDevice> InputInjector<P> {
    /// Hold between button down and up. Long enough for the game to see a
    /// discrete click rather than a drag.
    pub const DEFAULT_CLICK_HOLD: Duration = Duration::from_millis(5);

    /// Creates an injector with the default click hold
    pub fn new(device: P) -> Self {
        Self::with_click_hold(device, Self::DEFAULT_CLICK_HOLD)
    }

    /// Creates an injector with a custom click hold
    pub fn with_click_hold(device: P, click_hold: Duration) -> Self {
        Self { device, click_hold }
    }

    /// Underlying pointer device
    pub fn device(&self) -> &P {
        &self.device
    }

    pub fn cursor_position(&self) -> Result<Point, PlatformError> {
        self.device.cursor_position()
    }

    pub fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError> {
        self.device.set_cursor_position(point)
    }

    pub fn click_left(&self) -> Result<(), PlatformError> {
        self.click(MouseButton::Left)
    }

    pub fn click_right(&self) -> Result<(), PlatformError> {
        self.click(MouseButton::Right)
    }

    /// Moves to `point` and left-clicks there
    pub fn left_click_at(&self, point: Point) -> Result<(), PlatformError> {
        self.set_cursor_position(point)?;
        self.click_left()
    }

    /// Moves to `point` and right-clicks there
    pub fn right_click_at(&self, point: Point) -> Result<(), PlatformError> {
        self.set_cursor_position(point)?;
        self.click_right()
    }

    /// Captures the cursor position and returns a guard restoring it on drop
    pub fn hold_cursor(&self) -> Result<CursorGuard<'_, P>, PlatformError> {
        CursorGuard::capture(self)
    }

    fn click(&self, button: MouseButton) -> Result<(), PlatformError> {
        trace!("{button:?} click");
        self.device.send_button(button, ButtonState::Down)?;
        if !self.click_hold.is_zero() {
            thread::sleep(self.click_hold);
        }
        self.device.send_button(button, ButtonState::Up)
    }
}

/// RAII hold on the user's cursor position
///
/// Restores the captured position exactly once, when dropped. This covers
/// normal completion, cancellation, `?` early returns, and unwinding.
#[derive(Debug)]
pub struct CursorGuard<'a, P: PointerDevice> {
    injector: &'a InputInjector<P>,
    origin: Point,
}

impl<'a, P: PointerDevice> CursorGuard<'a, P> {
    /// Captures the current cursor position
    pub fn capture(injector: &'a InputInjector<P>) -> Result<Self, PlatformError> {
        let origin = injector.cursor_position()?;
        Ok(Self { injector, origin })
    }

    /// Position that will be restored
    pub fn origin(&self) -> Point {
        self.origin
    }
}

impl<P: PointerDevice> Drop for CursorGuard<'_, P> {
    fn drop(&mut self) {
        if let Err(e) = self.injector.set_cursor_position(self.origin) {
            warn!("failed to restore cursor to {}: {e}", self.origin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::panic::{self, AssertUnwindSafe};

    /// Records every call made to it.
    #[derive(Debug, Default)]
    struct RecorderPointer {
        position: Cell<Point>,
        buttons: RefCell<Vec<(MouseButton, ButtonState, Point)>>,
        fail_query: bool,
    }

    impl PointerDevice for RecorderPointer {
        fn cursor_position(&self) -> Result<Point, PlatformError> {
            if self.fail_query {
                return Err(PlatformError::CursorQueryFailed);
            }
            Ok(self.position.get())
        }

        fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError> {
            self.position.set(point);
            Ok(())
        }

        fn send_button(&self, button: MouseButton, state: ButtonState) -> Result<(), PlatformError> {
            self.buttons.borrow_mut().push((button, state, self.position.get()));
            Ok(())
        }
    }

    fn injector() -> InputInjector<RecorderPointer> {
        InputInjector::with_click_hold(RecorderPointer::default(), Duration::ZERO)
    }

    #[test]
    fn click_is_down_then_up() {
        let injector = injector();
        injector.click_right().unwrap();
        assert_eq!(
            *injector.device().buttons.borrow(),
            vec![
                (MouseButton::Right, ButtonState::Down, Point::default()),
                (MouseButton::Right, ButtonState::Up, Point::default()),
            ]
        );
    }

    #[test]
    fn click_at_moves_first() {
        let injector = injector();
        injector.left_click_at(Point::new(40, 50)).unwrap();
        let buttons = injector.device().buttons.borrow();
        assert_eq!(buttons.len(), 2);
        assert!(buttons.iter().all(|&(b, _, p)| b == MouseButton::Left && p == Point::new(40, 50)));
    }

    #[test]
    fn guard_restores_on_drop() {
        let injector = injector();
        injector.set_cursor_position(Point::new(7, 9)).unwrap();
        {
            let guard = injector.hold_cursor().unwrap();
            assert_eq!(guard.origin(), Point::new(7, 9));
            injector.right_click_at(Point::new(300, 400)).unwrap();
            assert_eq!(injector.cursor_position().unwrap(), Point::new(300, 400));
        }
        assert_eq!(injector.cursor_position().unwrap(), Point::new(7, 9));
    }

    #[test]
    fn guard_restores_on_early_return() {
        fn run(injector: &InputInjector<RecorderPointer>) -> Result<(), PlatformError> {
            let _guard = injector.hold_cursor()?;
            injector.set_cursor_position(Point::new(1, 1))?;
            Err(PlatformError::InjectionFailed { sent: 0, expected: 1 })
        }

        let injector = injector();
        injector.set_cursor_position(Point::new(20, 30)).unwrap();
        assert!(run(&injector).is_err());
        assert_eq!(injector.cursor_position().unwrap(), Point::new(20, 30));
    }

    #[test]
    fn guard_restores_on_panic() {
        let injector = injector();
        injector.set_cursor_position(Point::new(12, 34)).unwrap();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = injector.hold_cursor().unwrap();
            injector.right_click_at(Point::new(600, 700)).unwrap();
            panic!("sequence blew up mid-click");
        }));

        assert!(result.is_err());
        assert_eq!(injector.device().position.get(), Point::new(12, 34));
    }

    #[test]
    fn guard_capture_propagates_query_failure() {
        let device = RecorderPointer { fail_query: true, ..Default::default() };
        let injector = InputInjector::with_click_hold(device, Duration::ZERO);
        assert!(matches!(injector.hold_cursor(), Err(PlatformError::CursorQueryFailed)));
    }
}

//! Recording desktop double shared by the sequencer and dispatcher tests

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};

use crate::domain::core::Point;
use crate::domain::hotkeys::VirtualKey;
use crate::platform::{
    ButtonState, KeyboardState, MouseButton, PlatformError, PointerDevice, WindowProbe,
};

/// Something the mock desktop observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Move(Point),
    Button(MouseButton, ButtonState, Point),
}

/// A fake desktop that records every call made to it.
///
/// Focus is controlled by `title` (or a per-query `title_script`), keys by
/// `held`, and `press_after_clicks` presses a key once enough button-down
/// events have been injected.
#[derive(Debug)]
pub struct MockDesktop {
    pub cursor: Cell<Point>,
    pub events: RefCell<Vec<Event>>,
    pub title: RefCell<Option<String>>,
    pub title_script: RefCell<VecDeque<Option<String>>>,
    pub held: RefCell<HashSet<VirtualKey>>,
    pub press_after_clicks: Cell<Option<(VirtualKey, usize)>>,
    pub fail_button: Cell<bool>,
}

impl MockDesktop {
    pub const GAME: &'static str = "Grim Dawn";
    pub const HOME: Point = Point::new(555, 444);

    /// Game focused, cursor at `HOME`, nothing held
    pub fn focused() -> Self {
        Self {
            cursor: Cell::new(Self::HOME),
            events: RefCell::new(Vec::new()),
            title: RefCell::new(Some(Self::GAME.to_string())),
            title_script: RefCell::new(VecDeque::new()),
            held: RefCell::new(HashSet::new()),
            press_after_clicks: Cell::new(None),
            fail_button: Cell::new(false),
        }
    }

    /// Some other window in front
    pub fn unfocused() -> Self {
        let desktop = Self::focused();
        *desktop.title.borrow_mut() = Some("Notepad".into());
        desktop
    }

    pub fn hold(&self, key: VirtualKey) {
        self.held.borrow_mut().insert(key);
    }

    pub fn release(&self, key: VirtualKey) {
        self.held.borrow_mut().remove(&key);
    }

    /// Positions of button-down events for `button`
    pub fn clicks(&self, button: MouseButton) -> Vec<Point> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                Event::Button(b, ButtonState::Down, p) if b == button => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Number of button-down events of any kind
    pub fn click_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Button(_, ButtonState::Down, _)))
            .count()
    }
}

impl PointerDevice for MockDesktop {
    fn cursor_position(&self) -> Result<Point, PlatformError> {
        Ok(self.cursor.get())
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), PlatformError> {
        self.cursor.set(point);
        self.events.borrow_mut().push(Event::Move(point));
        Ok(())
    }

    fn send_button(&self, button: MouseButton, state: ButtonState) -> Result<(), PlatformError> {
        if self.fail_button.get() {
            return Err(PlatformError::InjectionFailed { sent: 0, expected: 1 });
        }
        self.events
            .borrow_mut()
            .push(Event::Button(button, state, self.cursor.get()));
        Ok(())
    }
}

impl WindowProbe for MockDesktop {
    fn foreground_title(&self) -> Option<String> {
        if let Some(scripted) = self.title_script.borrow_mut().pop_front() {
            return scripted;
        }
        self.title.borrow().clone()
    }
}

impl KeyboardState for MockDesktop {
    fn is_key_down(&self, key: VirtualKey) -> bool {
        if self.held.borrow().contains(&key) {
            return true;
        }
        match self.press_after_clicks.get() {
            Some((trigger, clicks)) => trigger == key && self.click_count() >= clicks,
            None => false,
        }
    }
}

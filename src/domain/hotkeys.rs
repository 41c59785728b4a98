//! Hotkey bindings and dispatch priority
//!
//! Maps the agent's logical actions to virtual key codes. Bindings are
//! optional: a key name that cannot be parsed leaves its action unbound,
//! which makes the action unreachable rather than failing startup.

use std::fmt;

/// Virtual key code as understood by the OS key-state query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    /// Code of F1; F2..F24 follow contiguously
    pub const F1: VirtualKey = VirtualKey(0x70);
    pub const F2: VirtualKey = VirtualKey(0x71);
    pub const F3: VirtualKey = VirtualKey(0x72);
    pub const F4: VirtualKey = VirtualKey(0x73);
    pub const F5: VirtualKey = VirtualKey(0x74);
    pub const F10: VirtualKey = VirtualKey(0x79);

    /// Highest function key the OS defines
    pub const MAX_FUNCTION_KEY: u16 = 24;

    /// Virtual key for function key `Fn`
    ///
    /// # Returns
    /// `None` unless `n` is in `1..=24`
    pub fn function(n: u16) -> Option<Self> {
        if (1..=Self::MAX_FUNCTION_KEY).contains(&n) {
            Some(VirtualKey(Self::F1.0 + (n - 1)))
        } else {
            None
        }
    }

    /// Parses a key name such as `"F2"` or `" f10 "`
    ///
    /// Only function keys are recognized. Any other string yields `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let digits = name.strip_prefix('F').or_else(|| name.strip_prefix('f'))?;
        let n: u16 = digits.parse().ok()?;
        Self::function(n)
    }

    /// Raw code for the key-state query
    pub fn code(self) -> u16 {
        self.0
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = Self::F1.0 + Self::MAX_FUNCTION_KEY - 1;
        if (Self::F1.0..=last).contains(&self.0) {
            write!(f, "F{}", self.0 - Self::F1.0 + 1)
        } else {
            write!(f, "VK 0x{:02X}", self.0)
        }
    }
}

/// Inventory action triggered by a hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Sell every slot of the main grid, then the secondary grid
    SellAll,
    /// Sell every slot of the secondary grid
    SellSecondary,
    /// Dismantle every slot of the main grid, then the secondary grid
    DismantleAll,
    /// Dismantle every slot of the secondary grid
    DismantleSecondary,
}

impl Action {
    /// Dispatch priority, highest first
    pub const PRIORITY: [Action; 4] = [
        Action::SellAll,
        Action::SellSecondary,
        Action::DismantleAll,
        Action::DismantleSecondary,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::SellAll => "sell-all",
            Action::SellSecondary => "sell-secondary",
            Action::DismantleAll => "dismantle-all",
            Action::DismantleSecondary => "dismantle-secondary",
        };
        f.write_str(name)
    }
}

/// Key assignment for every action plus the global-exit key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBindings {
    pub sell_all: Option<VirtualKey>,
    pub sell_secondary: Option<VirtualKey>,
    pub dismantle_all: Option<VirtualKey>,
    pub dismantle_secondary: Option<VirtualKey>,
    pub global_exit: Option<VirtualKey>,
}

impl HotkeyBindings {
    /// Key bound to an action, if any
    pub fn key_for(&self, action: Action) -> Option<VirtualKey> {
        match action {
            Action::SellAll => self.sell_all,
            Action::SellSecondary => self.sell_secondary,
            Action::DismantleAll => self.dismantle_all,
            Action::DismantleSecondary => self.dismantle_secondary,
        }
    }

    /// Bound actions in dispatch order
    ///
    /// Unbound actions are left out, so they can never fire.
    pub fn priority_list(&self) -> Vec<(Action, VirtualKey)> {
        Action::PRIORITY
            .iter()
            .filter_map(|&action| self.key_for(action).map(|key| (action, key)))
            .collect()
    }
}

impl Default for HotkeyBindings {
    /// F2..F5 for the four actions, F10 to exit
    fn default() -> Self {
        Self {
            sell_all: Some(VirtualKey::F2),
            sell_secondary: Some(VirtualKey::F3),
            dismantle_all: Some(VirtualKey::F4),
            dismantle_secondary: Some(VirtualKey::F5),
            global_exit: Some(VirtualKey::F10),
        }
    }
}

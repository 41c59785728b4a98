//! Agent configuration
//!
//! Loaded once at startup from `config.json` and validated into an
//! immutable [`AppConfig`] that is passed explicitly to every component.
//!
//! # Example
//!
//! ```json
//! {
//!   "general": { "debug": false, "target_window": "Grim Dawn" },
//!   "shortcuts": { "sell_all": "F2", "global_exit": "F10" },
//!   "coordinates": {
//!     "transmute_tab_location": "640, 180",
//!     "dismantle_tab_location": "720, 180",
//!     "dismantle_item_location": "700, 420",
//!     "dismantle_button_location": "700, 520",
//!     "confirm_dismantle_location": "900, 600"
//!   },
//!   "sleeps": { "panel_open": 0.35, "action": 0.1 },
//!   "inventory_grid_main": { "start_x": 1100, "start_y": 500, "cols": 12, "rows": 8 },
//!   "inventory_grid_secondary": { "start_x": 1500, "start_y": 500, "cols": 8, "rows": 8 }
//! }
//! ```
//!
//! `general` and `shortcuts` may be omitted entirely. Everything else is
//! required; a missing key fails the load.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::domain::core::Point;
use crate::domain::grid::{CellGeometry, GridSpec};
use crate::domain::hotkeys::{HotkeyBindings, VirtualKey};

/// File name looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Errors from loading or validating the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{} not found or unreadable: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("coordinates.{key}: {value:?} is not an \"x, y\" pair")]
    InvalidPoint { key: &'static str, value: String },

    #[error("general.target_window must not be blank")]
    BlankTargetWindow,

    #[error("{key}: grid extends past the i32 screen coordinate range")]
    GridOutOfRange { key: &'static str },

    #[error("sleeps.{key}: {value} is not a non-negative number of seconds")]
    InvalidDelay { key: &'static str, value: f64 },

    #[error("cannot locate the executable directory: {0}")]
    ExecutableDir(#[source] std::io::Error),
}

/// Fixed screen locations clicked by the dismantle sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPoints {
    pub transmute_tab: Point,
    pub dismantle_tab: Point,
    pub dismantle_item: Point,
    pub dismantle_button: Point,
    pub confirm_dismantle: Point,
}

/// Fixed pacing between synthesized steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// Wait after clicking a tab, for its panel to open
    pub panel_open: Duration,
    /// Wait after every other click
    pub action: Duration,
}

impl Delays {
    /// No waiting at all
    pub const NONE: Delays = Delays {
        panel_open: Duration::ZERO,
        action: Duration::ZERO,
    };
}

/// Validated, immutable agent configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Verbose logging, and single-cell dismantle for checking coordinates
    pub debug: bool,
    /// Substring matched against the foreground window title
    pub target_window: String,
    pub bindings: HotkeyBindings,
    pub points: ActionPoints,
    pub delays: Delays,
    pub main_grid: GridSpec,
    pub secondary_grid: GridSpec,
}

impl AppConfig {
    /// Default target window title
    pub const DEFAULT_TARGET: &'static str = "Grim Dawn";

    /// Loads configuration from a JSON file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Loads `config.json` from the directory holding the executable
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&default_path()?)
    }

    /// Parses and validates configuration text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        raw.validate()
    }
}

/// Path of `config.json` next to the running executable
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::ExecutableDir)?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(CONFIG_FILE_NAME))
}

//  Raw file schema

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    general: RawGeneral,
    #[serde(default)]
    shortcuts: RawShortcuts,
    coordinates: RawCoordinates,
    sleeps: RawSleeps,
    inventory_grid_main: GridSpec,
    inventory_grid_secondary: GridSpec,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawGeneral {
    debug: bool,
    target_window: String,
}

impl Default for RawGeneral {
    fn default() -> Self {
        Self {
            debug: false,
            target_window: AppConfig::DEFAULT_TARGET.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawShortcuts {
    sell_all: String,
    sell_secondary: String,
    dismantle_all: String,
    dismantle_secondary: String,
    global_exit: String,
}

impl Default for RawShortcuts {
    fn default() -> Self {
        Self {
            sell_all: "F2".into(),
            sell_secondary: "F3".into(),
            dismantle_all: "F4".into(),
            dismantle_secondary: "F5".into(),
            global_exit: "F10".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCoordinates {
    transmute_tab_location: String,
    dismantle_tab_location: String,
    dismantle_item_location: String,
    dismantle_button_location: String,
    confirm_dismantle_location: String,
}

#[derive(Debug, Deserialize)]
struct RawSleeps {
    panel_open: f64,
    action: f64,
}

impl RawConfig {
    fn validate(self) -> Result<AppConfig, ConfigError> {
        let shortcuts = &self.shortcuts;
        let bindings = HotkeyBindings {
            sell_all: binding("sell_all", &shortcuts.sell_all),
            sell_secondary: binding("sell_secondary", &shortcuts.sell_secondary),
            dismantle_all: binding("dismantle_all", &shortcuts.dismantle_all),
            dismantle_secondary: binding("dismantle_secondary", &shortcuts.dismantle_secondary),
            global_exit: binding("global_exit", &shortcuts.global_exit),
        };

        let coords = &self.coordinates;
        let points = ActionPoints {
            transmute_tab: point("transmute_tab_location", &coords.transmute_tab_location)?,
            dismantle_tab: point("dismantle_tab_location", &coords.dismantle_tab_location)?,
            dismantle_item: point("dismantle_item_location", &coords.dismantle_item_location)?,
            dismantle_button: point("dismantle_button_location", &coords.dismantle_button_location)?,
            confirm_dismantle: point("confirm_dismantle_location", &coords.confirm_dismantle_location)?,
        };

        let delays = Delays {
            panel_open: delay("panel_open", self.sleeps.panel_open)?,
            action: delay("action", self.sleeps.action)?,
        };

        // An empty substring would match every window title
        if self.general.target_window.trim().is_empty() {
            return Err(ConfigError::BlankTargetWindow);
        }

        let main_grid = addressable("inventory_grid_main", self.inventory_grid_main)?;
        let secondary_grid = addressable("inventory_grid_secondary", self.inventory_grid_secondary)?;

        Ok(AppConfig {
            debug: self.general.debug,
            target_window: self.general.target_window,
            bindings,
            points,
            delays,
            main_grid,
            secondary_grid,
        })
    }
}

fn binding(key: &str, name: &str) -> Option<VirtualKey> {
    let parsed = VirtualKey::parse(name);
    if parsed.is_none() {
        warn!("shortcuts.{key}: {name:?} is not a function key, action disabled");
    }
    parsed
}

fn point(key: &'static str, value: &str) -> Result<Point, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidPoint {
        key,
        value: value.to_string(),
    })
}

fn addressable(key: &'static str, grid: GridSpec) -> Result<GridSpec, ConfigError> {
    if grid.is_addressable(CellGeometry::INVENTORY) {
        Ok(grid)
    } else {
        Err(ConfigError::GridOutOfRange { key })
    }
}

fn delay(key: &'static str, seconds: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::InvalidDelay { key, value: seconds })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "general": { "debug": true, "target_window": "Grim Dawn" },
        "shortcuts": {
            "sell_all": "F6",
            "sell_secondary": "f7",
            "dismantle_all": "F8",
            "dismantle_secondary": "F9",
            "global_exit": "F12"
        },
        "coordinates": {
            "transmute_tab_location": "640, 180",
            "dismantle_tab_location": "720,180",
            "dismantle_item_location": " 700 , 420 ",
            "dismantle_button_location": "700, 520",
            "confirm_dismantle_location": "900, 600"
        },
        "sleeps": { "panel_open": 0.25, "action": 0.125 },
        "inventory_grid_main": { "start_x": 1100, "start_y": 500, "cols": 12, "rows": 8 },
        "inventory_grid_secondary": { "start_x": 1500, "start_y": 500, "cols": 8, "rows": 8 }
    }"#;

    fn without(section: &str) -> String {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value.as_object_mut().unwrap().remove(section);
        value.to_string()
    }

    #[test]
    fn parse_full_config() {
        let cfg = AppConfig::from_json(FULL).unwrap();
        assert!(cfg.debug);
        assert_eq!(cfg.target_window, "Grim Dawn");
        assert_eq!(cfg.bindings.sell_all, Some(VirtualKey(0x75)));
        assert_eq!(cfg.bindings.sell_secondary, Some(VirtualKey(0x76)));
        assert_eq!(cfg.bindings.global_exit, Some(VirtualKey(0x7B)));
        assert_eq!(cfg.points.transmute_tab, Point::new(640, 180));
        assert_eq!(cfg.points.dismantle_tab, Point::new(720, 180));
        assert_eq!(cfg.points.dismantle_item, Point::new(700, 420));
        assert_eq!(cfg.delays.panel_open, Duration::from_millis(250));
        assert_eq!(cfg.delays.action, Duration::from_millis(125));
        assert_eq!(cfg.main_grid, GridSpec::new(1100, 500, 12, 8));
        assert_eq!(cfg.secondary_grid, GridSpec::new(1500, 500, 8, 8));
    }

    #[test]
    fn optional_sections_use_defaults() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("general");
        obj.remove("shortcuts");

        let cfg = AppConfig::from_json(&value.to_string()).unwrap();
        assert!(!cfg.debug);
        assert_eq!(cfg.target_window, AppConfig::DEFAULT_TARGET);
        assert_eq!(cfg.bindings, HotkeyBindings::default());
    }

    #[test]
    fn partial_shortcuts_fall_back_per_key() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["shortcuts"] = serde_json::json!({ "sell_all": "F1" });

        let cfg = AppConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(cfg.bindings.sell_all, Some(VirtualKey::F1));
        assert_eq!(cfg.bindings.sell_secondary, Some(VirtualKey::F3));
        assert_eq!(cfg.bindings.global_exit, Some(VirtualKey::F10));
    }

    #[test]
    fn unparseable_key_disables_action() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["shortcuts"]["dismantle_all"] = serde_json::json!("Shift");

        let cfg = AppConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(cfg.bindings.dismantle_all, None);
        assert_eq!(cfg.bindings.priority_list().len(), 3);
    }

    #[test]
    fn missing_required_sections_fail() {
        for section in [
            "coordinates",
            "sleeps",
            "inventory_grid_main",
            "inventory_grid_secondary",
        ] {
            let err = AppConfig::from_json(&without(section)).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{section}: {err}");
        }
    }

    #[test]
    fn missing_required_key_fails() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["coordinates"]
            .as_object_mut()
            .unwrap()
            .remove("confirm_dismantle_location");

        let err = AppConfig::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("confirm_dismantle_location"));
    }

    #[test]
    fn malformed_point_fails() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["coordinates"]["dismantle_tab_location"] = serde_json::json!("720;180");

        let err = AppConfig::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPoint { key: "dismantle_tab_location", .. }
        ));
    }

    #[test]
    fn blank_target_window_fails() {
        for target in ["", "   "] {
            let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
            value["general"]["target_window"] = serde_json::json!(target);

            let err = AppConfig::from_json(&value.to_string()).unwrap_err();
            assert!(matches!(err, ConfigError::BlankTargetWindow), "{target:?}: {err}");
        }
    }

    #[test]
    fn overflowing_grid_fails() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["inventory_grid_secondary"]["start_x"] = serde_json::json!(i32::MAX - 10);

        let err = AppConfig::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::GridOutOfRange { key: "inventory_grid_secondary" }
        ));
    }

    #[test]
    fn negative_delay_fails() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["sleeps"]["action"] = serde_json::json!(-0.5);

        let err = AppConfig::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay { key: "action", .. }));
    }

    #[test]
    fn missing_file_fails_with_read_error() {
        let path = Path::new("definitely/not/here/config.json");
        let err = AppConfig::load(path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn default_path_ends_with_file_name() {
        let path = default_path().unwrap();
        assert!(path.ends_with(CONFIG_FILE_NAME));
    }
}

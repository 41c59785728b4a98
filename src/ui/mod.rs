pub mod icon;
#[cfg(windows)]
pub mod tray;

#[cfg(windows)]
pub use tray::{Tray, TrayError, TrayExit};

//! Configuration module
//!
//! The configuration file is read once at startup. Everything downstream
//! receives the validated [`AppConfig`] value and never touches the file.

pub mod settings;

pub use settings::{ActionPoints, AppConfig, ConfigError, Delays};

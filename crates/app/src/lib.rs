//! Wiki client - HTTP bootstrap
//!
//! Loads configuration and wires the shared API client with its request
//! augmentation hook.

pub mod bootstrap;
pub mod config;

pub use bootstrap::{App, BootstrapError, bootstrap, bootstrap_with};
pub use config::{AppConfig, ConfigError};

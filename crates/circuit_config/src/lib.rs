//! Parsing and validation of `circuit_lib.toml` build options.
//!
//! This crate reads the options that steer how a circuit library is linked and
//! checked, and produces a strongly-typed [`CircuitLibConfig`]. Every field has a
//! default, so an empty document (or no document at all) is a valid configuration.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;

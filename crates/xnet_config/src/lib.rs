//! Parsing and validation of `xnet.toml` translation options.
//!
//! This crate reads the translation configuration file and produces a
//! strongly-typed [`TranslateConfig`] naming the target part or chip family
//! and the identifier-resolution mode.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;

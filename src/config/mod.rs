//! Configuration for the CLI and server
//!
//! Provides types, discovery and parsing for the optional `qrcode.toml`.

pub mod loader;
pub mod schema;

pub use loader::{find_config, find_config_from, load_config, ConfigError};
pub use schema::*;

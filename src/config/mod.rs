//! Configuration module
//!
//! Loads application settings from TOML files and environment variables, and
//! bypass rules from JSON.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str, load_rules, parse_rules, rule_warnings};
pub use types::*;

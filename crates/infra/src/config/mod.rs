//! Configuration loading
//!
//! Locates, parses and validates the worker configuration file.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_file, parse_config, probe_config_paths, CONFIG_ENV_VAR};

//! Configuration loader
//!
//! Loads the worker configuration from a TOML or JSON file.
//!
//! ## Loading Strategy
//! 1. If `HELPDESK_CONFIG` is set, load exactly that file
//! 2. Otherwise probe the standard locations (see [`probe_config_paths`])
//! 3. Format is detected by extension (`.toml` or `.json`)
//! 4. The parsed configuration is validated before it is returned
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./helpdesk.{toml,json}` then `./config.{toml,json}` (working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use helpdesk_domain::{HelpdeskConfig, HelpdeskError, Result};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "HELPDESK_CONFIG";

const FILE_NAMES: [&str; 4] = ["helpdesk.toml", "helpdesk.json", "config.toml", "config.json"];

/// Load and validate configuration.
///
/// # Errors
/// Returns `HelpdeskError::Config` if no file is found, the file cannot be
/// parsed, or the configuration fails validation.
pub fn load() -> Result<HelpdeskConfig> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => {
            tracing::debug!(var = CONFIG_ENV_VAR, "configuration path taken from environment");
            load_from_file(Some(PathBuf::from(path)))
        }
        None => load_from_file(None),
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `HelpdeskError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<HelpdeskConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HelpdeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HelpdeskError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HelpdeskError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `HelpdeskError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<HelpdeskConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HelpdeskError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HelpdeskError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(HelpdeskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    probe_in(&roots)
}

fn probe_in(roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

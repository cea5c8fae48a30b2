//! Configuration loading and discovery for `qrcode.toml`

use super::schema::QrConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked for during discovery
pub const CONFIG_FILE_NAME: &str = "qrcode.toml";

/// Directory under the XDG config home
pub const CONFIG_DIR_NAME: &str = "qrmcp";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse qrcode.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find qrcode.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for qrcode.toml
/// 2. Check XDG_CONFIG_HOME/qrmcp/qrcode.toml (or ~/.config/qrmcp/qrcode.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find qrcode.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find qrcode.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, [`find_config`] is consulted
/// and built-in defaults are used when nothing is found.
pub fn load_config(path: Option<&Path>) -> Result<QrConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(QrConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<QrConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: QrConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

//! Configuration directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-reviews/`
//! - macOS: `~/Library/Application Support/gh-reviews/`
//! - Windows: `%APPDATA%\gh-reviews\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-reviews";

/// Get the application config directory
///
/// Unlike a cache directory this is never created here; a missing
/// directory simply means there is no global config.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the global config file, if the platform has a config directory
pub fn app_config_path() -> Option<PathBuf> {
    config_dir().ok().map(|dir| dir.join("config.toml"))
}

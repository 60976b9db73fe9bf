//! Centralized configuration paths for colorsnap
//!
//! User-level files live under:
//! - Unix/macOS: `~/.config/colorsnap/`
//! - Windows: `%APPDATA%\colorsnap\`
//!
//! A project-local `colorsnap.yaml` in the working directory takes
//! precedence over the user-level config file.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "colorsnap";

/// Project-local config file name, resolved against the working directory
pub const PROJECT_CONFIG_FILE: &str = "colorsnap.yaml";

/// Base config directory for colorsnap
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/colorsnap`
///   - Else: `~/.config/colorsnap`
///
/// Windows:
///   - `%APPDATA%\colorsnap`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/colorsnap/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `./colorsnap.yaml`
pub fn project_config_file() -> PathBuf {
    PathBuf::from(PROJECT_CONFIG_FILE)
}

/// `~/.config/colorsnap/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}

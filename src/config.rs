//! Settings file location.
//!
//! The settings file is resolved in this order of precedence (highest wins):
//! 1. Explicit path (from the `--settings` CLI flag)
//! 2. `THEMEKEEPER_SETTINGS` environment variable
//! 3. $XDG_CONFIG_HOME/themekeeper/settings.toml (or
//!    ~/.config/themekeeper/settings.toml, or the platform config dir)

use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable that points at an explicit settings file.
pub const SETTINGS_PATH_ENV: &str = "THEMEKEEPER_SETTINGS";

const APP_DIR: &str = "themekeeper";
const SETTINGS_FILE: &str = "settings.toml";

/// Resolve the settings file path from the process environment.
pub fn resolve_settings_path(path_override: Option<&str>) -> Result<PathBuf, ConfigError> {
    resolve_settings_path_with(
        path_override,
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(crate) fn resolve_settings_path_with<FEnv, FRoot>(
    path_override: Option<&str>,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<PathBuf, ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(path) = path_override.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = env_lookup(SETTINGS_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    config_root()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .ok_or_else(|| {
            ConfigError::Invalid(
                "unable to resolve default settings path; pass --settings".to_string(),
            )
        })
}

/// Return the per-user config root (`$XDG_CONFIG_HOME` or `~/.config`).
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

//! Platform-specific config locations.
//!
//! - Linux: `~/.config/fluxgraph/`
//! - macOS: `~/Library/Application Support/fluxgraph/`
//! - Windows: `%APPDATA%\fluxgraph\`

use std::path::PathBuf;

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "fluxgraph";

/// File name of the default simulation config.
pub const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// `<config dir>/fluxgraph/config.toml`.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Ensures the user config directory exists and returns it.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_layout() {
        let path = default_config_path();
        assert!(path.ends_with("fluxgraph/config.toml"), "{path:?}");
        assert_eq!(path.parent(), Some(user_config_dir().as_path()));
    }
}

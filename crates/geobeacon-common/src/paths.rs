//! Path resolution for Geobeacon
//!
//! Locates the configuration directory following:
//! 1. Systemd service directory (CONFIGURATION_DIRECTORY)
//! 2. XDG Base Directory Specification (XDG_CONFIG_HOME)
//! 3. Default fallback (~/.config/geobeacon)

use std::path::PathBuf;

/// Application name used in XDG subdirectories
const APP_NAME: &str = "geobeacon";

/// Get the configuration directory path
///
/// Priority:
/// 1. `CONFIGURATION_DIRECTORY` environment variable (systemd)
/// 2. `XDG_CONFIG_HOME/geobeacon` (XDG spec)
/// 3. `~/.config/geobeacon` (XDG default)
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CONFIGURATION_DIRECTORY") {
        return PathBuf::from(dir);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config).join(APP_NAME);
    }

    if let Some(home) = home_dir() {
        return home.join(".config").join(APP_NAME);
    }

    // Ultimate fallback
    PathBuf::from("/etc").join(APP_NAME)
}

/// Get the default config file path
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the user's home directory
fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }

    #[cfg(windows)]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(home));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_with_env() {
        let original = std::env::var("CONFIGURATION_DIRECTORY").ok();

        std::env::set_var("CONFIGURATION_DIRECTORY", "/test/config");
        assert_eq!(config_dir(), PathBuf::from("/test/config"));
        assert_eq!(config_file(), PathBuf::from("/test/config/config.toml"));

        if let Some(val) = original {
            std::env::set_var("CONFIGURATION_DIRECTORY", val);
        } else {
            std::env::remove_var("CONFIGURATION_DIRECTORY");
        }
    }
}

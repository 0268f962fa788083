// Marktables platform paths
// Config and data directories for Linux, macOS and Windows, selected with `cfg(target_os)`.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "marktables";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Resolves an XDG base directory, falling back to `$HOME/<fallback>`.
#[cfg_attr(not(any(target_os = "linux", test)), allow(dead_code))]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(APP_DIR),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join(APP_DIR),
    }
}

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/marktables` or `~/.config/marktables`
/// - **macOS**: `~/Library/Application Support/marktables`
/// - **Windows**: `%APPDATA%/marktables`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Returns the platform-specific data directory, home of the database file.
///
/// - **Linux**: `$XDG_DATA_HOME/marktables` or `~/.local/share/marktables`
/// - **macOS**: same as the config directory
/// - **Windows**: same as the config directory
pub fn get_data_dir() -> PathBuf {
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}

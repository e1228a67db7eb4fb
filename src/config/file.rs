//! Configuration file discovery

use std::path::PathBuf;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./eg-backend.yaml",
    "./eg-backend.yml",
    "./eg-backend.json",
    "~/.config/eg-backend/config.yaml",
    "~/.eg-backend.yaml",
];

/// Find a configuration file in the standard locations
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

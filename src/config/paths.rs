//! Config file locations.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Path to the global config file.
///
/// `$XDG_CONFIG_HOME/pagewright/config.toml` when the variable is set, otherwise the
/// platform config directory for `pagewright`.
pub fn global_config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("pagewright").join("config.toml"));
    }
    ProjectDirs::from("", "", "pagewright").map(|dirs| dirs.config_dir().join("config.toml"))
}

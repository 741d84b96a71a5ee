//! Locating the config file.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// File name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Per-application directory under the user config root.
const APP_DIR: &str = "cinematerial";

/// Returns where the config file lives.
///
/// `--dir` wins; otherwise `$XDG_CONFIG_HOME/cinematerial/config.toml`,
/// falling back to `~/.config/cinematerial/config.toml`.
///
/// # Errors
///
/// Returns an error if no `--dir` is given and neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_with_env(dir, |name| std::env::var(name).ok())
}

/// [`resolve_config_path`] with an injectable environment lookup.
fn config_path_with_env(
    dir: Option<&PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.join(CONFIG_FILE));
    }

    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let root = match non_empty("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(
            non_empty("HOME").context("neither XDG_CONFIG_HOME nor HOME is set")?,
        )
        .join(".config"),
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}

//! Root configuration type and file loading.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::animations::AnimationsConfig;
use super::decorations::DecorationsConfig;

/// Layout hints the animation engine needs from the tiler.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// New windows become the master window of the layout.
    ///
    /// Decides which edge a freshly opened window slides in from.
    /// Default: true
    pub new_is_master: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self { Self { new_is_master: true } }
}

/// Root configuration structure for Glide.
///
/// # Example
///
/// ```jsonc
/// {
///   // Window transitions
///   "animations": {
///     "openType": "zoom",
///     "durations": { "open": 250 }
///   },
///   "decorations": { "borderWidth": 2 },
///   "layout": { "newIsMaster": false }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GlideConfig {
    /// Window animation settings.
    pub animations: AnimationsConfig,

    /// Border, shadow, corner and opacity settings.
    pub decorations: DecorationsConfig,

    /// Layout hints.
    pub layout: LayoutConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/glide/config.json, \
         the platform config directory, or ~/.glide.json"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".glide.jsonc", ".glide.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/glide/config.jsonc` or `config.json`, when set
/// 2. `~/.config/glide/config.jsonc` or `config.json`
/// 3. The platform config directory (`dirs::config_dir()`)
/// 4. `~/.glide.jsonc` or `~/.glide.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    fn push_dir(dir: &Path, paths: &mut Vec<PathBuf>) {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME may already point at ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(&PathBuf::from(xdg_config).join("glide"), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(&home.join(".config").join("glide"), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(&config_dir.join("glide"), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::Io` if a configuration file exists but could not be read.
/// Returns `ConfigError::Parse` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(GlideConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .ok_or(ConfigError::NotFound)
        .and_then(load_config_from_path)
}

/// Loads the configuration from a specific file.
///
/// Comments (`//` and `/* */`) are stripped before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, `ConfigError::Io`
/// if it cannot be read and `ConfigError::Parse` if it is not valid JSON.
pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<(GlideConfig, PathBuf), ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: GlideConfig = serde_json::from_reader(reader)?;

    Ok((config, path.to_path_buf()))
}

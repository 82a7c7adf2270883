//! Configuration module for Glide.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//!
//! The process-wide instance is loaded once; the animation engine itself
//! receives an `Arc<GlideConfig>` snapshot and never reads the global.

pub mod schema;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use schema::{generate_schema, generate_schema_json};
pub use types::{
    AnimationCurves, AnimationDurations, AnimationType, AnimationsConfig, BezierCurve,
    BorderColorState, BorderColors, ConfigError, DecorationsConfig, GlideConfig, LayoutConfig, Rgba,
    ShadowConfig, TagAnimationDirection, config_paths, load_config as load_config_default,
    load_config_from_path, parse_hex_color,
};

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<GlideConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before `init()` or `get_config()` to take effect.
///
/// Returns `true` if the path was set, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from disk, falling back to defaults.
fn load_or_default() -> GlideConfig {
    let result = CUSTOM_CONFIG_PATH.get().map_or_else(load_config_default, load_config_from_path);

    match result {
        Ok((config, path)) => {
            tracing::info!(path = %path.display(), "loaded configuration");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            GlideConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            GlideConfig::default()
        }
    }
}

/// Initializes and returns the global configuration instance.
///
/// This function is idempotent - calling it multiple times will return
/// the same configuration instance.
pub fn init() -> &'static GlideConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the global configuration instance, initializing it if necessary.
pub fn get_config() -> &'static GlideConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

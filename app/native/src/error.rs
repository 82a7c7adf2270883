//! Error types for Glide.
//!
//! The animation engine itself never fails: degenerate geometry and unknown
//! clients are absorbed at the boundary. These errors cover the fallible
//! surfaces around it (configuration, client mapping, the scene graph).

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced to the host compositor.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum GlideError {
    /// Invalid arguments passed by the host.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Scene graph boundary failure.
    #[error("Scene error: {0}")]
    SceneError(String),
    /// A monitor handle that the engine does not know about.
    #[error("Unknown monitor: {0}")]
    UnknownMonitor(String),
}

impl From<ConfigError> for GlideError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<&str> for GlideError {
    fn from(msg: &str) -> Self { Self::InvalidArguments(msg.to_string()) }
}

//! Configuration types for Glide.
//!
//! This module provides all configuration types organized by domain.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod animations;
pub mod color;
pub mod decorations;
pub mod root;

// Animation types
pub use animations::{
    AnimationCurves, AnimationDurations, AnimationType, AnimationsConfig, BezierCurve,
    TagAnimationDirection,
};
// Color types
pub use color::{Rgba, parse_hex_color};
// Decoration types
pub use decorations::{BorderColorState, BorderColors, DecorationsConfig, ShadowConfig};
// Root config types
pub use root::{
    ConfigError, GlideConfig, LayoutConfig, config_paths, load_config, load_config_from_path,
};

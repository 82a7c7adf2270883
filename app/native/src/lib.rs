//! Glide - per-window animation and decoration engine for tiling compositors.
//!
//! The library animates window geometry changes (open, move/resize, tag
//! switch, close) and derives per-frame decorations (clip, border, shadow,
//! opacity, rounded corners) from the animated box. Rendering goes through the
//! [`SceneGraph`](modules::compositor::SceneGraph) trait.

pub mod cli;
pub mod config;
pub mod error;
pub mod modules;

pub use error::GlideError;
pub use modules::compositor::{AnimationEngine, CompositorEffect, SceneArena, SceneGraph};

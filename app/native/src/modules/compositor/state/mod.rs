//! State module for the animation engine.
//!
//! This module contains:
//! - Core types (`Rect`, `Monitor`, `Client`, identifiers)
//! - The per-client animation sub-state

mod animation;
mod types;

pub use animation::{AnimationAction, ClientAnimation, TagPhase, frames_for};
pub use types::{
    Client, ClientFlags, ClientId, ClientNodes, ClientRules, ClientSpec, LayoutKind, Monitor,
    MonitorGeometry, MonitorId, Rect,
};

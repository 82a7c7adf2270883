//! Per-window animation and decoration engine for tiling compositors.
//!
//! This module provides:
//! - [`AnimationEngine`], owning monitors, clients and closing snapshots
//! - The per-client transition state machine (open, move, tag and close)
//! - Derivation of clip, border, shadow and buffer effects from animated boxes
//! - The [`SceneGraph`] boundary and an in-memory [`SceneArena`]
//!
//! The host compositor feeds layout decisions through [`AnimationEngine::resize`],
//! calls [`AnimationEngine::on_frame`] from each monitor's frame callback, and
//! drains [`CompositorEffect`]s.

pub mod effects;
pub mod engine;
pub mod geometry;
pub mod scene;
pub mod state;

pub use effects::animation::transition::SwitchDirection;
pub use effects::{CompositorEffect, EffectQueue};
pub use engine::AnimationEngine;
pub use geometry::CornerLocation;
pub use scene::{Layer, NodeId, SceneArena, SceneGraph, SurfaceInfo, SurfaceRole};
pub use state::{
    AnimationAction, Client, ClientFlags, ClientId, ClientRules, ClientSpec, LayoutKind, Monitor,
    MonitorId, Rect, TagPhase,
};

//! Effect types and orchestration for the animation engine.
//!
//! Animation steps mutate a client and drive the scene graph directly. What
//! the engine cannot do itself (scheduling frames, notifying the pointer,
//! suspending or configuring the client) is queued as a [`CompositorEffect`]
//! for the host to drain.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     AnimationEngine                          │
//! │  (resize / tag_in / tag_out / on_frame / unmap_client)       │
//! └─────────────────────────┬────────────────────────────────────┘
//!                           │ &mut Client + ClientContext
//!                           ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                animation state machine                       │
//! │  - resize, set_pending_state, commit, advance_frame          │
//! │  - fade-out snapshots                                        │
//! └─────────────────────────┬────────────────────────────────────┘
//!                           │ animated box
//!                           ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                decoration applier                            │
//! │  - clip, border, shadow, buffer scale / opacity / radius     │
//! └─────────────────────────┬────────────────────────────────────┘
//!                           │ SceneGraph commands
//!                           ▼
//!                      renderer (host)
//! ```

pub mod animation;
pub mod decoration;

use std::sync::Arc;

use super::state::{ClientId, MonitorGeometry, MonitorId, Rect};
use crate::config::GlideConfig;

// ============================================================================
// Effect Types
// ============================================================================

/// Requests for the host compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorEffect {
    /// Schedule another frame on a monitor.
    RequestFrame { monitor: MonitorId },

    /// Re-send pointer enter to a client that ended up under the cursor.
    PointerEnter { client: ClientId },

    /// Suspend or resume a client that left or re-entered the visible tags.
    SetSuspended { client: ClientId, suspended: bool },

    /// Ask the client to resize its surface.
    ConfigureSize { client: ClientId, width: i32, height: i32 },
}

/// Ordered effect queue.
///
/// Frame requests are idempotent: a monitor appears at most once until drained.
#[derive(Debug, Default)]
pub struct EffectQueue {
    effects: Vec<CompositorEffect>,
}

impl EffectQueue {
    #[must_use]
    pub const fn new() -> Self { Self { effects: Vec::new() } }

    /// Queue an effect.
    pub fn push(&mut self, effect: CompositorEffect) {
        if matches!(effect, CompositorEffect::RequestFrame { .. }) && self.effects.contains(&effect) {
            return;
        }
        self.effects.push(effect);
    }

    /// Schedule a frame on a monitor.
    pub fn request_frame(&mut self, monitor: MonitorId) {
        self.push(CompositorEffect::RequestFrame { monitor });
    }

    /// Whether a frame is pending for a monitor.
    #[must_use]
    pub fn has_frame_request(&self, monitor: MonitorId) -> bool {
        self.effects.contains(&CompositorEffect::RequestFrame { monitor })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.effects.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.effects.len() }

    /// Queued effects, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[CompositorEffect] { &self.effects }

    /// Take every queued effect.
    pub fn drain(&mut self) -> Vec<CompositorEffect> { std::mem::take(&mut self.effects) }
}

// ============================================================================
// Client Context
// ============================================================================

/// Everything about the world a client's animation step needs to know.
///
/// Built by the engine before it borrows the client mutably.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub config: Arc<GlideConfig>,
    pub monitor: MonitorGeometry,
    /// Union of all monitors.
    pub layout_box: Rect,
    /// The client is being moved or resized interactively.
    pub grabbed: bool,
    /// The client is the selection of the focused monitor.
    pub focused: bool,
    /// The pointer is over the client.
    pub hovered: bool,
    /// Tiled clients visible on the client's monitor.
    pub visible_tiling: usize,
    /// The client is on its monitor's visible tags.
    pub visible_on_monitor: bool,
    /// Animated box of the client that swallowed this one.
    pub swallower_box: Option<Rect>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_requests_are_deduplicated() {
        let mut queue = EffectQueue::new();
        queue.request_frame(MonitorId(0));
        queue.request_frame(MonitorId(0));
        queue.request_frame(MonitorId(1));

        assert_eq!(queue.len(), 2);
        assert!(queue.has_frame_request(MonitorId(1)));
    }

    #[test]
    fn test_other_effects_are_kept_in_order() {
        let mut queue = EffectQueue::new();
        let configure = CompositorEffect::ConfigureSize {
            client: ClientId(1),
            width: 792,
            height: 592,
        };
        queue.push(configure);
        queue.push(configure);
        queue.push(CompositorEffect::PointerEnter { client: ClientId(1) });

        let drained = queue.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0], configure);
        assert!(queue.is_empty());
    }
}

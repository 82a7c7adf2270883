//! Close transitions on snapshots of unmapped windows.
//!
//! When a window closes its rendered subtree is copied into the fade-out
//! layer. The copy outlives the client and is animated towards an end box
//! until it is destroyed.

use super::easing::{evaluate, interpolate_rect};
use super::transition::close_end;
use crate::config::{AnimationType, AnimationsConfig, BezierCurve, BorderColorState};
use crate::modules::compositor::effects::{ClientContext, EffectQueue};
use crate::modules::compositor::scene::{Layer, NodeId, SceneGraph};
use crate::modules::compositor::state::{
    AnimationAction, Client, ClientAnimation, MonitorId, Rect, frames_for,
};

/// A closing window's snapshot and its transition.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeOutClient {
    pub node: NodeId,
    pub monitor: MonitorId,
    /// Box of the window when it closed, on screen.
    pub geom: Rect,
    /// End box, relative to the snapshot's anchor.
    pub target: Rect,
    pub close_type: AnimationType,
    pub no_fade_out: bool,
    pub animation: ClientAnimation,
}

impl FadeOutClient {
    /// Snapshots a closing client and sets up its close transition.
    ///
    /// Returns `None` when the client is not animated on close or the
    /// snapshot could not be taken.
    pub fn start<S: SceneGraph>(
        client: &Client,
        ctx: &ClientContext,
        scene: &mut S,
        effects: &mut EffectQueue,
    ) -> Option<Self> {
        let animations = &ctx.config.animations;
        let close_type = client.close_type(animations.close_type);
        if client.unmanaged || close_type == AnimationType::None {
            return None;
        }

        scene.set_enabled(client.nodes.root, true);
        let normal = ctx.config.decorations.colors.color_for(BorderColorState::Normal);
        scene.set_rect_color(client.nodes.border, normal);
        let snapshot = scene.snapshot(client.nodes.root, Layer::FadeOut);
        scene.set_enabled(client.nodes.root, false);

        let Some(node) = snapshot else {
            tracing::warn!(client = %client.id, "failed to snapshot closing client, skipping close animation");
            return None;
        };

        let animated = client.animation.current;
        let duration_ms = AnimationAction::Close.duration_ms(animations);
        let animation = ClientAnimation {
            initial: Rect::new(0, 0, animated.width, animated.height),
            current: animated,
            action: AnimationAction::Close,
            passed_frames: 0,
            total_frames: frames_for(duration_ms, ctx.monitor.frame_period_ms),
            duration_ms,
            curve: AnimationAction::Close.curve(animations),
            running: true,
            should_animate: false,
            tag: client.animation.tag,
        };

        let target = close_end(close_type, animated, client.geom, ctx.monitor.frame, animations);

        scene.set_enabled(node, true);
        effects.request_frame(ctx.monitor.id);

        tracing::debug!(
            client = %client.id,
            ?close_type,
            frames = animation.total_frames,
            "starting close animation"
        );

        Some(Self {
            node,
            monitor: ctx.monitor.id,
            geom: animated,
            target,
            close_type,
            no_fade_out: client.rules.no_fade_out,
            animation,
        })
    }

    /// Advances the transition by one frame. Returns `true` once finished and
    /// the snapshot destroyed.
    pub fn tick<S: SceneGraph>(&mut self, config: &AnimationsConfig, scene: &mut S) -> bool {
        let progress = self.animation.step();
        let factor = evaluate(self.animation.curve, progress);
        let current = interpolate_rect(self.animation.initial, self.target, factor);
        self.animation.current = current;
        scene.set_position(self.node, current.x, current.y);

        let fade = config.fade_out && !self.no_fade_out;
        #[allow(clippy::cast_possible_truncation)]
        let opacity = (f64::from(config.fadeout_begin_opacity) - progress).max(0.0) as f32;
        let zoom = self.close_type == AnimationType::Zoom;

        if fade || zoom {
            for buffer in scene.buffers(self.node) {
                if fade {
                    scene.set_buffer_opacity(buffer.id, opacity);
                }
                if zoom {
                    scene.set_buffer_dest_size(buffer.id, current.width, current.height);
                }
            }
        }

        if self.animation.is_finished() {
            scene.destroy_node(self.node);
            return true;
        }
        false
    }

    /// Curve captured when the close started.
    #[must_use]
    pub const fn curve(&self) -> BezierCurve { self.animation.curve }
}

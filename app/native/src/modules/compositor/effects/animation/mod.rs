//! Per-client transition state machine.
//!
//! A layout request goes through [`resize`], which picks the transition kind
//! and start box, then [`set_pending_state`] and [`commit`] decide whether to
//! animate or snap. Each output frame calls [`draw_frame`], which steps a
//! running transition via [`advance_frame`].

pub mod easing;
pub mod fadeout;
pub mod transition;

use super::decoration::{
    apply_border, apply_clip, draw_shadow, refresh_border_color, set_opacity, surface_clip,
    target_opacity,
};
use super::{ClientContext, CompositorEffect, EffectQueue};
use crate::config::AnimationType;
use crate::modules::compositor::scene::SceneGraph;
use crate::modules::compositor::state::{AnimationAction, Client, LayoutKind, Rect, TagPhase};

/// Pulls a box that left `bounds` entirely back to its nearest edge.
#[must_use]
pub const fn apply_bounds(geom: Rect, bounds: Rect) -> Rect {
    let mut bounded = geom;
    if bounded.x >= bounds.right() {
        bounded.x = bounds.right() - bounded.width;
    }
    if bounded.y >= bounds.bottom() {
        bounded.y = bounds.bottom() - bounded.height;
    }
    if bounded.x + bounded.width <= bounds.x {
        bounded.x = bounds.x;
    }
    if bounded.y + bounded.height <= bounds.y {
        bounded.y = bounds.y;
    }
    bounded
}

// ============================================================================
// Resize
// ============================================================================

/// Moves a client to `target` and starts the matching transition.
///
/// `interactive` bounds the box by the whole layout instead of the monitor's
/// window area.
pub fn resize<S: SceneGraph>(
    client: &mut Client,
    ctx: &ClientContext,
    scene: &mut S,
    effects: &mut EffectQueue,
    target: Rect,
    interactive: bool,
) {
    let animations = &ctx.config.animations;
    client.need_output_flush = true;

    let min = 1 + 2 * client.bw;
    let mut geom = Rect::new(target.x, target.y, target.width.max(min), target.height.max(min));
    let free_scroll = ctx.monitor.layout == LayoutKind::Scroller && (!client.flags.floating || ctx.grabbed);
    if !free_scroll {
        let bounds = if interactive || client.flags.floating || client.flags.fullscreen {
            ctx.layout_box
        } else {
            ctx.monitor.window_area
        };
        geom = apply_bounds(geom, bounds);
    }
    client.geom = geom;

    let anim = &mut client.animation;
    let keeps_open = anim.action == AnimationAction::Open && anim.tag == TagPhase::None && geom == client.current;
    if !keeps_open {
        anim.action = if matches!(anim.tag, TagPhase::Entering | TagPhase::Leaving) {
            AnimationAction::Tag
        } else if client.is_pending_open_animation {
            AnimationAction::Open
        } else {
            AnimationAction::Move
        };
    }
    anim.duration_ms = anim.action.duration_ms(animations);
    anim.curve = anim.action.curve(animations);

    let (tag, animated) = (anim.tag, anim.current);
    client.animainit_geom = match tag {
        TagPhase::Leaving => animated,
        TagPhase::Entering => Rect::new(
            client.animainit_geom.x,
            client.animainit_geom.y,
            animated.width,
            animated.height,
        ),
        TagPhase::None | TagPhase::Left if client.is_pending_open_animation => {
            transition::open_start(client, ctx)
        }
        TagPhase::None | TagPhase::Left => animated,
    };

    if client.rules.no_border || client.flags.killing || client.flags.fullscreen {
        client.bw = 0;
    }

    effects.push(CompositorEffect::ConfigureSize {
        client: client.id,
        width: geom.width - 2 * client.bw,
        height: geom.height - 2 * client.bw,
    });

    if ctx.grabbed {
        client.animation.running = false;
        client.need_output_flush = false;
        client.animainit_geom = geom;
        client.current = geom;
        client.pending = geom;
        client.animation.current = geom;
        scene.set_position(client.nodes.root, geom.x, geom.y);
        draw_shadow(client, ctx, scene);
        apply_border(client, ctx, scene);
        scene.set_subsurface_clip(client.nodes.surface, surface_clip(client));
        return;
    }

    if client.animation.tag != TagPhase::Leaving && !client.flags.killing {
        client.pending = geom;
    }

    let opening = client.animation.action == AnimationAction::Open;
    if let Some(swallower) = ctx.swallower_box.filter(|_| opening && client.swallowed_by.is_some()) {
        client.animainit_geom = swallower;
    }

    if client.swallowing.is_some() {
        client.animainit_geom = geom;
    }

    if (client.flags.global || client.flags.unglobal)
        && client.flags.floating
        && client.animation.action == AnimationAction::Tag
    {
        client.animainit_geom = geom;
    }

    set_pending_state(client, ctx, scene, effects);
    refresh_border_color(client, ctx, scene);
}

// ============================================================================
// Commit
// ============================================================================

/// Decides whether the pending box is animated to, then commits it.
pub fn set_pending_state<S: SceneGraph>(
    client: &mut Client,
    ctx: &ClientContext,
    scene: &mut S,
    effects: &mut EffectQueue,
) {
    let animations = &ctx.config.animations;

    let mut should_animate = if !animations.enabled {
        false
    } else if client.animation.tag == TagPhase::Entering {
        true
    } else {
        !(ctx.grabbed || (!client.is_pending_open_animation && client.current == client.pending))
    };

    if client.animation.action == AnimationAction::Open
        && client.open_type(animations.open_type) == AnimationType::None
    {
        should_animate = false;
    }

    client.animation.should_animate = should_animate;
    commit(client, ctx, scene, effects);
}

/// Makes the pending box current and starts or snaps the transition.
pub fn commit<S: SceneGraph>(
    client: &mut Client,
    ctx: &ClientContext,
    scene: &mut S,
    effects: &mut EffectQueue,
) {
    client.current = client.pending;

    if client.animation.should_animate {
        if !client.animation.running {
            client.animation.current = client.animainit_geom;
        }
        client.animation.initial = client.animainit_geom;
        client.animation.restart(ctx.monitor.frame_period_ms);
        client.animation.running = true;
        client.animation.should_animate = false;
        effects.request_frame(ctx.monitor.id);

        tracing::trace!(
            client = %client.id,
            action = ?client.animation.action,
            from = %client.animation.initial,
            to = %client.current,
            frames = client.animation.total_frames,
            "starting transition"
        );
    } else if !client.animation.running {
        let geom = client.geom;
        client.animation.passed_frames = 1;
        client.animation.total_frames = 1;
        client.animation.current = geom;
        client.animation.initial = geom;
        client.animainit_geom = geom;
        client.pending = geom;
        client.current = geom;
        client.is_pending_open_animation = false;
        scene.set_position(client.nodes.root, geom.x, geom.y);
        apply_clip(client, ctx, scene, 1.0);
        client.need_output_flush = false;
    }
}

// ============================================================================
// Frames
// ============================================================================

/// Steps a running transition by one frame.
pub fn advance_frame<S: SceneGraph>(
    client: &mut Client,
    ctx: &ClientContext,
    scene: &mut S,
    effects: &mut EffectQueue,
) {
    let anim = &mut client.animation;
    let progress = anim.step();
    let factor = easing::evaluate(anim.curve, progress);
    anim.current = easing::interpolate_rect(anim.initial, client.current, factor);
    scene.set_position(client.nodes.root, anim.current.x, anim.current.y);

    client.is_pending_open_animation = false;

    if client.animation.is_finished() {
        let anim = &mut client.animation;
        anim.action = AnimationAction::Move;
        anim.running = false;
        match anim.tag {
            TagPhase::Entering => anim.tag = TagPhase::None,
            TagPhase::Leaving => {
                anim.tag = TagPhase::Left;
                anim.current = client.geom;
                scene.set_enabled(client.nodes.root, false);
                effects.push(CompositorEffect::SetSuspended {
                    client: client.id,
                    suspended: true,
                });
            }
            TagPhase::None | TagPhase::Left => {}
        }

        if ctx.hovered && ctx.focused {
            effects.push(CompositorEffect::PointerEnter { client: client.id });
        }

        client.need_output_flush = false;
        tracing::trace!(client = %client.id, geom = %client.geom, "transition finished");
    }

    apply_clip(client, ctx, scene, factor);
}

/// Draws one output frame for a client. Returns `true` when anything moved.
pub fn draw_frame<S: SceneGraph>(
    client: &mut Client,
    ctx: &ClientContext,
    scene: &mut S,
    effects: &mut EffectQueue,
) -> bool {
    if client.flags.fullscreen || !client.animation.running {
        set_opacity(client, scene, target_opacity(client, ctx));
    }

    if !client.need_output_flush {
        return false;
    }

    if ctx.config.animations.enabled && client.animation.running {
        advance_frame(client, ctx, scene, effects);
    } else {
        let geom = client.geom;
        scene.set_position(client.nodes.root, geom.x, geom.y);
        client.animation.current = geom;
        apply_clip(client, ctx, scene, 1.0);
        client.need_output_flush = false;
    }
    true
}

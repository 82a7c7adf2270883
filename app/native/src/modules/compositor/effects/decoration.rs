//! Decoration and effect applier.
//!
//! Derives clip, border, shadow and buffer effects from a client's animated
//! box and pushes them to the scene graph. Called on every animation frame and
//! once more when a transition completes.

use super::ClientContext;
use crate::config::{BorderColorState, DecorationsConfig};
use crate::modules::compositor::geometry::{
    BufferScale, ClipTrim, CornerLocation, EdgeOffsets, ShadowParams, border_layout,
    corner_location, is_clipped_away, scaled_buffer_size, shadow_layout, should_scale,
    trim_offscreen,
};
use crate::modules::compositor::scene::{ClippedRegion, NodeId, SceneGraph, SurfaceRole};
use crate::modules::compositor::state::{AnimationAction, Client, Rect, TagPhase};

/// Parameters applied to every buffer of a client's surface tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferEffect {
    pub should_scale: bool,
    pub width_scale: f64,
    pub height_scale: f64,
    /// Clip size the scaled buffers must fit in.
    pub width: i32,
    pub height: i32,
    /// Fade-in ramp, added to the fade-in start opacity.
    pub percent: f32,
    /// Target opacity, an upper bound.
    pub opacity: f32,
    pub corners: CornerLocation,
}

/// Configured border width in pixels.
#[must_use]
pub fn border_px(decorations: &DecorationsConfig) -> i32 {
    i32::try_from(decorations.border_width).unwrap_or(0)
}

/// The monitor shows exactly this one tiled client.
const fn is_single(client: &Client, ctx: &ClientContext) -> bool {
    ctx.visible_tiling == 1 && client.is_tiled()
}

/// Border hidden by policy (fullscreen, or alone on the monitor when configured).
#[must_use]
pub fn hit_no_border(client: &Client, ctx: &ClientContext) -> bool {
    client.flags.fullscreen || (ctx.config.decorations.no_border_when_single && is_single(client, ctx))
}

/// Rounded corners for borders and shadows.
fn decoration_corners(client: &Client, ctx: &ClientContext) -> CornerLocation {
    if client.flags.fullscreen || (ctx.config.decorations.no_radius_when_single && is_single(client, ctx)) {
        CornerLocation::empty()
    } else {
        CornerLocation::ALL
    }
}

/// Opacity the client settles at: opaque when fullscreen, else per focus.
#[must_use]
pub fn target_opacity(client: &Client, ctx: &ClientContext) -> f32 {
    let decorations = &ctx.config.decorations;
    if client.flags.fullscreen {
        1.0
    } else if ctx.focused {
        client.rules.focused_opacity.unwrap_or(decorations.focused_opacity)
    } else {
        client.rules.unfocused_opacity.unwrap_or(decorations.unfocused_opacity)
    }
}

/// Surface clip for the authoritative box, in surface coordinates.
#[must_use]
pub const fn surface_clip(client: &Client) -> Rect {
    let (x, y) = if client.is_x11 { (0, 0) } else { (client.surface.x, client.surface.y) };
    Rect::new(x, y, client.geom.width - client.bw, client.geom.height - client.bw)
}

// ============================================================================
// Border Color
// ============================================================================

/// State that selects the border color, highest priority first.
#[must_use]
pub const fn border_state(client: &Client, ctx: &ClientContext) -> BorderColorState {
    let flags = &client.flags;
    if flags.urgent {
        BorderColorState::Urgent
    } else if flags.fullscreen {
        BorderColorState::Maximized
    } else if flags.global {
        BorderColorState::Global
    } else if flags.overlay {
        BorderColorState::Overlay
    } else if flags.scratchpad {
        BorderColorState::Scratchpad
    } else if ctx.focused {
        BorderColorState::Focused
    } else {
        BorderColorState::Normal
    }
}

/// Paints the border in the color of the client's current state.
pub fn refresh_border_color<S: SceneGraph>(client: &Client, ctx: &ClientContext, scene: &mut S) {
    let color = ctx.config.decorations.colors.color_for(border_state(client, ctx));
    scene.set_rect_color(client.nodes.border, color);
}

// ============================================================================
// Clip To Hide
// ============================================================================

/// Trims the surface clip to the monitor and hides clients that slid off it.
///
/// Only tiled clients and clients in a tag switch are considered; floating
/// windows may hang off the output freely.
pub fn clip_to_hide<S: SceneGraph>(
    client: &mut Client,
    ctx: &ClientContext,
    scene: &mut S,
    clip: &mut Rect,
) -> ClipTrim {
    let tag = client.animation.tag;
    if !client.is_tiled() && !tag.is_active() {
        return ClipTrim::default();
    }

    let trim = trim_offscreen(client.animation.current, ctx.monitor.frame, client.bw, clip);
    let may_hide = client.is_tiled() || matches!(tag, TagPhase::Entering | TagPhase::Leaving);

    if is_clipped_away(*clip, client.bw) && may_hide {
        if !client.is_clip_to_hide {
            tracing::debug!(client = %client.id, clip = %clip, "client clipped off-screen, hiding");
        }
        client.is_clip_to_hide = true;
        scene.set_enabled(client.nodes.root, false);
    } else if client.is_clip_to_hide && ctx.visible_on_monitor && tag != TagPhase::Left {
        tracing::debug!(client = %client.id, "client back on-screen, showing");
        client.is_clip_to_hide = false;
        scene.set_enabled(client.nodes.root, true);
    }

    trim
}

// ============================================================================
// Border
// ============================================================================

/// Lays out the border rectangle around the animated box.
pub fn apply_border<S: SceneGraph>(client: &mut Client, ctx: &ClientContext, scene: &mut S) {
    if client.flags.killing {
        return;
    }

    let decorations = &ctx.config.decorations;
    let no_border = hit_no_border(client, ctx);
    let corners = decoration_corners(client, ctx);

    if no_border && decorations.smartgaps {
        client.bw = 0;
        client.fake_no_border = true;
    } else if no_border {
        scene.set_rect_size(client.nodes.border, 0, 0);
        scene.set_position(client.nodes.surface, client.bw, client.bw);
        client.fake_no_border = true;
        return;
    } else if !client.flags.fullscreen && ctx.visible_on_monitor {
        client.bw = if client.rules.no_border { 0 } else { border_px(decorations) };
        client.fake_no_border = false;
    }

    let animated = client.animation.current;
    let offsets = EdgeOffsets::for_client(animated, ctx.monitor.frame, ctx.grabbed);
    let layout = border_layout(animated, client.bw, offsets);
    let radius = decorations.border_radius;

    scene.set_position(client.nodes.surface, client.bw, client.bw);
    scene.set_rect_size(client.nodes.border, layout.rect.width, layout.rect.height);
    scene.set_position(client.nodes.border, layout.rect.x, layout.rect.y);
    scene.set_corner_radius(client.nodes.border, radius, corners);
    scene.set_clipped_region(
        client.nodes.border,
        ClippedRegion {
            area: layout.inner,
            corner_radius: radius,
            corners,
        },
    );
}

// ============================================================================
// Shadow
// ============================================================================

/// Lays out the drop shadow under the animated box.
pub fn draw_shadow<S: SceneGraph>(client: &Client, ctx: &ClientContext, scene: &mut S) {
    if client.flags.killing {
        return;
    }

    let decorations = &ctx.config.decorations;
    let shadows = &decorations.shadows;
    if !shadows.enabled || (!client.flags.floating && shadows.only_floating) {
        scene.set_rect_size(client.nodes.shadow, 0, 0);
        return;
    }

    let corners = decoration_corners(client, ctx);
    let bwoffset = if client.bw != 0 && hit_no_border(client, ctx) { client.bw } else { 0 };
    let params = ShadowParams {
        size: i32::try_from(shadows.size).unwrap_or(0),
        offset_x: shadows.offset_x,
        offset_y: shadows.offset_y,
    };
    let monitor = (!ctx.grabbed).then_some(ctx.monitor.frame);
    let layout = shadow_layout(client.animation.current, client.bw, bwoffset, params, monitor);

    scene.set_position(client.nodes.shadow, layout.position.0, layout.position.1);
    scene.set_rect_size(client.nodes.shadow, layout.size.0, layout.size.1);
    scene.set_clipped_region(
        client.nodes.shadow,
        ClippedRegion {
            area: layout.clip,
            corner_radius: decorations.border_radius,
            corners,
        },
    );
}

// ============================================================================
// Buffers
// ============================================================================

/// Applies scale, corner radius and opacity to the client's surface buffers.
pub fn buffer_set_effect<S: SceneGraph>(
    client: &Client,
    ctx: &ClientContext,
    scene: &mut S,
    mut effect: BufferEffect,
) {
    if client.flags.killing {
        return;
    }

    if client.animation.tag.is_active() || ctx.grabbed {
        effect.should_scale = false;
    }

    if decoration_corners(client, ctx).is_empty() {
        effect.corners = CornerLocation::empty();
    }

    let decorations = &ctx.config.decorations;
    apply_buffer_effect(
        scene,
        client.nodes.surface,
        &effect,
        decorations.border_radius,
        ctx.config.animations.fadein_begin_opacity,
    );
}

fn apply_buffer_effect<S: SceneGraph>(
    scene: &mut S,
    node: NodeId,
    effect: &BufferEffect,
    radius: i32,
    fadein_begin_opacity: f32,
) {
    let scale = effect.should_scale && should_scale(effect.width_scale, effect.height_scale);
    let opacity = (effect.percent + fadein_begin_opacity).min(effect.opacity);

    for buffer in scene.buffers(node) {
        let Some(surface) = buffer.surface else {
            continue;
        };

        if scale {
            match scaled_buffer_size(
                (surface.width, surface.height),
                (effect.width_scale, effect.height_scale),
                (effect.width, effect.height),
                surface.role == SurfaceRole::Subsurface,
            ) {
                BufferScale::Resize { width, height } => {
                    scene.set_buffer_dest_size(buffer.id, width, height);
                }
                BufferScale::Unchanged => {}
                BufferScale::Skip => continue,
            }
        }

        if surface.role == SurfaceRole::Popup {
            continue;
        }

        scene.set_buffer_corner_radius(buffer.id, radius, effect.corners);
        scene.set_buffer_opacity(buffer.id, opacity);
    }
}

/// Sets the same opacity on every surface buffer.
pub fn set_opacity<S: SceneGraph>(client: &Client, scene: &mut S, opacity: f32) {
    for buffer in scene.buffers(client.nodes.surface) {
        scene.set_buffer_opacity(buffer.id, opacity);
    }
}

// ============================================================================
// Clip
// ============================================================================

/// Re-derives and applies every decoration for the client's animated box.
///
/// `factor` is the eased progress of this frame; at exactly 1 buffers are
/// shown at their native size.
#[allow(clippy::float_cmp)]
pub fn apply_clip<S: SceneGraph>(client: &mut Client, ctx: &ClientContext, scene: &mut S, factor: f64) {
    if client.flags.killing {
        return;
    }

    let animations = &ctx.config.animations;
    let radius = ctx.config.decorations.border_radius;
    let opacity = target_opacity(client, ctx);

    if !animations.enabled {
        client.animation.running = false;
        client.need_output_flush = false;
        client.animainit_geom = client.geom;
        client.current = client.geom;
        client.pending = client.geom;
        client.animation.current = client.geom;
        client.corners = corner_location(client.geom, ctx.monitor.frame, radius);

        let mut clip = surface_clip(client);
        clip_to_hide(client, ctx, scene, &mut clip);
        apply_border(client, ctx, scene);
        draw_shadow(client, ctx, scene);

        if !clip.is_valid() {
            return;
        }

        scene.set_subsurface_clip(client.nodes.surface, clip);
        buffer_set_effect(
            client,
            ctx,
            scene,
            BufferEffect {
                should_scale: true,
                width_scale: 1.0,
                height_scale: 1.0,
                width: clip.width,
                height: clip.height,
                percent: opacity,
                opacity,
                corners: client.corners,
            },
        );
        return;
    }

    client.corners = corner_location(client.animation.current, ctx.monitor.frame, radius);

    #[allow(clippy::cast_possible_truncation)]
    let percent = if client.animation.action == AnimationAction::Open
        && animations.fade_in
        && !client.rules.no_fade_in
    {
        client.animation.progress() as f32
    } else {
        1.0
    };

    let bw = client.bw;
    let width = client.animation.current.width - bw;
    let height = client.animation.current.height - bw;
    let geometry = client.surface;

    let mut clip = Rect::new(geometry.x, geometry.y, width - bw, height - bw);
    if client.is_x11 {
        clip.x = 0;
        clip.y = 0;
    }

    let trim = clip_to_hide(client, ctx, scene, &mut clip);
    apply_border(client, ctx, scene);
    draw_shadow(client, ctx, scene);

    if !clip.is_valid() {
        scene.set_enabled(client.nodes.surface, false);
        return;
    }
    scene.set_enabled(client.nodes.surface, true);
    scene.set_subsurface_clip(client.nodes.surface, clip);

    let actual_width = geometry.width - trim.x - trim.width;
    let actual_height = geometry.height - trim.y - trim.height;
    if actual_width <= 0 || actual_height <= 0 {
        return;
    }

    let (width_scale, height_scale) = if factor == 1.0 {
        (1.0, 1.0)
    } else {
        (
            f64::from(clip.width) / f64::from(actual_width),
            f64::from(clip.height) / f64::from(actual_height),
        )
    };

    buffer_set_effect(
        client,
        ctx,
        scene,
        BufferEffect {
            should_scale: true,
            width_scale,
            height_scale,
            width: clip.width,
            height: clip.height,
            percent,
            opacity,
            corners: client.corners,
        },
    );
}

// ============================================================================
// Tests
// ============================================================================

//! Start and end boxes of open, close and tag transitions.

use crate::config::{AnimationType, AnimationsConfig, TagAnimationDirection};
use crate::modules::compositor::effects::ClientContext;
use crate::modules::compositor::state::{Client, LayoutKind, Rect};

/// Screen edge a window slides in from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Direction of a tag switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwitchDirection {
    /// Towards a higher tag: old windows leave towards the start, new ones enter from the end.
    #[default]
    Next,
    Previous,
}

#[allow(clippy::cast_possible_truncation)]
fn scale(value: i32, ratio: f64) -> i32 { (f64::from(value) * ratio) as i32 }

// ============================================================================
// Open
// ============================================================================

/// Fixed slide direction for tiled windows, if one applies.
///
/// New tiles in a scroller or on an empty monitor rise from below; with a
/// single neighbour a new stack tile enters from the right, and a new master
/// always enters from the left.
#[must_use]
pub fn special_direction(client: &Client, ctx: &ClientContext) -> Option<SlideDirection> {
    if client.flags.floating {
        return None;
    }

    let new_is_master = ctx.config.layout.new_is_master;
    if ctx.monitor.layout == LayoutKind::Scroller || ctx.visible_tiling < 2 {
        Some(SlideDirection::Down)
    } else if ctx.visible_tiling == 2 && !new_is_master {
        Some(SlideDirection::Right)
    } else if new_is_master {
        Some(SlideDirection::Left)
    } else {
        None
    }
}

/// Edge of `area` closest to the centre of `geom`.
///
/// Ties between the horizontal and vertical distance go to the vertical edge.
#[must_use]
pub const fn nearest_edge(geom: Rect, area: Rect) -> SlideDirection {
    let (center_x, center_y) = geom.center();

    let (horizontal, horizontal_distance) = if area.right() - center_x < center_x - area.x {
        (SlideDirection::Right, area.right() - center_x)
    } else {
        (SlideDirection::Left, center_x - area.x)
    };

    let (vertical, vertical_distance) = if area.bottom() - center_y < center_y - area.y {
        (SlideDirection::Down, area.bottom() - center_y)
    } else {
        (SlideDirection::Up, center_y - area.y)
    };

    if horizontal_distance < vertical_distance { horizontal } else { vertical }
}

/// Box of the same size as `geom`, just past the monitor edge in `direction`.
#[must_use]
pub const fn slide_start(geom: Rect, monitor: Rect, direction: SlideDirection) -> Rect {
    match direction {
        SlideDirection::Up => Rect::new(geom.x, monitor.y - geom.height, geom.width, geom.height),
        SlideDirection::Down => Rect::new(
            geom.x,
            geom.y + monitor.height - (geom.y - monitor.y),
            geom.width,
            geom.height,
        ),
        SlideDirection::Left => Rect::new(monitor.x - geom.width, geom.y, geom.width, geom.height),
        SlideDirection::Right => Rect::new(
            geom.x + monitor.width - (geom.x - monitor.x),
            geom.y,
            geom.width,
            geom.height,
        ),
    }
}

/// Box centred on `geom`, scaled by `ratio`.
#[must_use]
pub fn zoom_box(geom: Rect, ratio: f64) -> Rect {
    let width = scale(geom.width, ratio);
    let height = scale(geom.height, ratio);
    Rect::new(
        geom.x + (geom.width - width) / 2,
        geom.y + (geom.height - height) / 2,
        width,
        height,
    )
}

/// Where a newly mapped client starts its open transition.
#[must_use]
pub fn open_start(client: &Client, ctx: &ClientContext) -> Rect {
    let animations = &ctx.config.animations;
    let geom = client.geom;

    match client.open_type(animations.open_type) {
        AnimationType::Fade | AnimationType::None => geom,
        AnimationType::Zoom => zoom_box(geom, animations.zoom_initial_ratio),
        AnimationType::Slide => {
            let direction = special_direction(client, ctx)
                .unwrap_or_else(|| nearest_edge(geom, ctx.monitor.window_area));
            slide_start(geom, ctx.monitor.frame, direction)
        }
    }
}

// ============================================================================
// Close
// ============================================================================

/// End box of a close transition, relative to the snapshot's anchor.
///
/// `animated` is where the window was on screen when it closed and `geom` its
/// layout box, which decides whether a slide leaves upwards or downwards.
#[must_use]
pub fn close_end(
    close_type: AnimationType,
    animated: Rect,
    geom: Rect,
    monitor: Rect,
    config: &AnimationsConfig,
) -> Rect {
    match close_type {
        AnimationType::Slide => {
            let below_center = geom.y + geom.height / 2 > monitor.y + monitor.height / 2;
            let y = if below_center {
                monitor.height - (animated.y - monitor.y)
            } else {
                monitor.y - animated.y - animated.height
            };
            Rect::new(0, y, animated.width, animated.height)
        }
        AnimationType::Zoom => {
            let width = scale(animated.width, config.zoom_end_ratio);
            let height = scale(animated.height, config.zoom_end_ratio);
            Rect::new(
                (animated.width - width) / 2,
                (animated.height - height) / 2,
                width,
                height,
            )
        }
        AnimationType::Fade | AnimationType::None => Rect::zero(),
    }
}

// ============================================================================
// Tag Switch
// ============================================================================

/// Offset a window moves by when it leaves a tag.
///
/// Entering windows start from the opposite offset.
#[must_use]
pub const fn leave_offset(
    direction: SwitchDirection,
    axis: TagAnimationDirection,
    monitor: Rect,
) -> (i32, i32) {
    let sign = match direction {
        SwitchDirection::Next => -1,
        SwitchDirection::Previous => 1,
    };
    match axis {
        TagAnimationDirection::Horizontal => (sign * monitor.width, 0),
        TagAnimationDirection::Vertical => (0, sign * monitor.height),
    }
}

// ============================================================================
// Tests
// ============================================================================

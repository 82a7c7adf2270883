//! Geometry derivation for decorations.
//!
//! Pure functions that turn a client's animated box and its monitor into the
//! boxes the scene graph needs: visible corners, off-screen overflow, border
//! and shadow layout, and buffer scaling. Nothing here touches the scene.

use bitflags::bitflags;

use super::state::Rect;

bitflags! {
    /// Corners that get rounded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CornerLocation: u8 {
        const TOP_LEFT = 1 << 0;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_LEFT = 1 << 2;
        const BOTTOM_RIGHT = 1 << 3;

        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        const LEFT = Self::TOP_LEFT.bits() | Self::BOTTOM_LEFT.bits();
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOTTOM_RIGHT.bits();
        const ALL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

/// Clamp to zero from below.
#[inline]
#[must_use]
pub const fn gezero(value: i32) -> i32 { if value > 0 { value } else { 0 } }

// ============================================================================
// Corners
// ============================================================================

/// Corners that stay rounded for a box on a monitor.
///
/// An edge that lies at least `radius` past the matching monitor edge loses
/// both of its corners.
#[must_use]
pub fn corner_location(target: Rect, monitor: Rect, radius: i32) -> CornerLocation {
    let mut corners = CornerLocation::ALL;

    if target.x + radius <= monitor.x {
        corners.remove(CornerLocation::LEFT);
    }
    if target.right() - radius >= monitor.right() {
        corners.remove(CornerLocation::RIGHT);
    }
    if target.y + radius <= monitor.y {
        corners.remove(CornerLocation::TOP);
    }
    if target.bottom() - radius >= monitor.bottom() {
        corners.remove(CornerLocation::BOTTOM);
    }

    corners
}

// ============================================================================
// Monitor Overflow
// ============================================================================

/// How far each edge of a box sticks out past the monitor. All values are `>= 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeOffsets {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl EdgeOffsets {
    pub const ZERO: Self = Self {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };

    /// Overflow of `target` past `monitor`.
    #[must_use]
    pub const fn overflow(target: Rect, monitor: Rect) -> Self {
        Self {
            left: gezero(monitor.x - target.x),
            right: gezero(target.right() - monitor.right()),
            top: gezero(monitor.y - target.y),
            bottom: gezero(target.bottom() - monitor.bottom()),
        }
    }

    /// Overflow against the monitor, or none for the grabbed client.
    #[must_use]
    pub const fn for_client(target: Rect, monitor: Rect, grabbed: bool) -> Self {
        if grabbed { Self::ZERO } else { Self::overflow(target, monitor) }
    }
}

/// Amount trimmed off the surface clip on each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipTrim {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Shrinks `clip` by the part of the surface that lies past the monitor.
///
/// The border may leave the monitor first; trimming starts once the surface
/// itself crosses the edge. Left wins over right and top over bottom.
#[must_use]
pub fn trim_offscreen(animated: Rect, monitor: Rect, bw: i32, clip: &mut Rect) -> ClipTrim {
    let out = EdgeOffsets::overflow(animated, monitor);
    let mut trim = ClipTrim::default();

    if out.left > 0 {
        trim.x = gezero(out.left - bw);
        clip.x += trim.x;
        clip.width -= trim.x;
    } else if out.right > 0 {
        trim.width = gezero(out.right - bw);
        clip.width -= trim.width;
    }

    if out.top > 0 {
        trim.y = gezero(out.top - bw);
        clip.y += trim.y;
        clip.height -= trim.y;
    } else if out.bottom > 0 {
        trim.height = gezero(out.bottom - bw);
        clip.height -= trim.height;
    }

    trim
}

/// The trimmed clip leaves nothing to show.
#[must_use]
pub const fn is_clipped_away(clip: Rect, bw: i32) -> bool {
    clip.width + bw <= 0 || clip.height + bw <= 0
}

// ============================================================================
// Border
// ============================================================================

/// Derived border geometry, relative to the client's root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderLayout {
    /// Visible part of the border rectangle.
    pub rect: Rect,
    /// Hole cut out of the border for the surface, relative to `rect`'s node.
    pub inner: Rect,
}

/// Lays out the border rectangle for an animated box.
#[must_use]
pub fn border_layout(animated: Rect, bw: i32, offsets: EdgeOffsets) -> BorderLayout {
    let mut inner_width = gezero(animated.width - 2 * bw);
    let mut inner_height = gezero(animated.height - 2 * bw);
    let inner_x = gezero(bw - offsets.left);
    let inner_y = gezero(bw - offsets.top);

    let rect = Rect::new(
        offsets.left,
        offsets.top,
        gezero(animated.width - offsets.left - offsets.right),
        gezero(animated.height - offsets.top - offsets.bottom),
    );

    if offsets.left > bw {
        inner_width = inner_width - offsets.left + bw;
    }
    if offsets.top > bw {
        inner_height = inner_height - offsets.top + bw;
    }
    if offsets.right > 0 {
        inner_width = animated.width.min(inner_width + offsets.right);
    }
    if offsets.bottom > 0 {
        inner_height = animated.height.min(inner_height + offsets.bottom);
    }

    BorderLayout {
        rect,
        inner: Rect::new(inner_x, inner_y, inner_width, inner_height),
    }
}

// ============================================================================
// Shadow
// ============================================================================

/// Shadow spread and offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadowParams {
    pub size: i32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Derived shadow geometry, relative to the client's root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowLayout {
    pub position: (i32, i32),
    pub size: (i32, i32),
    /// Region the window covers, in the shadow's own coordinates.
    pub clip: Rect,
}

/// Lays out the shadow for an animated box.
///
/// `bwoffset` is the border width when the border is hidden by policy (so the
/// shadow hugs the surface), otherwise 0. `monitor` is `None` for the grabbed
/// client, which may extend past the output.
#[must_use]
pub fn shadow_layout(
    animated: Rect,
    bw: i32,
    bwoffset: i32,
    params: ShadowParams,
    monitor: Option<Rect>,
) -> ShadowLayout {
    let width = animated.width - bw;
    let height = animated.height - bw;
    let delta = params.size + bw - bwoffset;

    let client_box = Rect::new(bwoffset, bwoffset, width - 2 * bwoffset, height - 2 * bwoffset);
    let shadow_box = Rect::new(
        params.offset_x,
        params.offset_y,
        width + 2 * delta,
        height + 2 * delta,
    );

    let clip = client_box
        .intersection(&shadow_box)
        .translated(-params.offset_x, -params.offset_y);

    let absolute = shadow_box.translated(animated.x, animated.y);
    let out = monitor.map_or(EdgeOffsets::ZERO, |m| EdgeOffsets::overflow(absolute, m));

    let left = out.left.min(shadow_box.width);
    let right = out.right.min(shadow_box.width);
    let top = out.top.min(shadow_box.height);
    let bottom = out.bottom.min(shadow_box.height);

    ShadowLayout {
        position: (shadow_box.x + left, shadow_box.y + top),
        size: (
            gezero(shadow_box.width - left - right),
            gezero(shadow_box.height - top - bottom),
        ),
        clip: clip.translated(-left, -top),
    }
}

// ============================================================================
// Buffer Scaling
// ============================================================================

/// Scaling is worthwhile only when some axis grows.
///
/// Shrinking is left to the clip: both axes below 1, or one axis at exactly 1
/// with the other below, keep the native buffer size.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn should_scale(width_scale: f64, height_scale: f64) -> bool {
    if height_scale < 1.0 && width_scale < 1.0 {
        return false;
    }
    if height_scale == 1.0 && width_scale < 1.0 {
        return false;
    }
    if height_scale < 1.0 && width_scale == 1.0 {
        return false;
    }
    true
}

/// What to do with one buffer while scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferScale {
    /// Set the destination size.
    Resize { width: i32, height: i32 },
    /// Leave the destination size alone.
    Unchanged,
    /// A sub-surface would grow past its parent's clip; leave the whole buffer alone.
    Skip,
}

/// Destination size for a surface buffer of `surface_size` scaled by the given
/// ratios and bounded by the `clip` size.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn scaled_buffer_size(
    surface_size: (i32, i32),
    scale: (f64, f64),
    clip: (i32, i32),
    is_subsurface: bool,
) -> BufferScale {
    let scale_axis = |size: i32, ratio: f64| -> i32 {
        if ratio < 1.0 { size } else { (ratio * f64::from(size)) as i32 }
    };

    let mut width = scale_axis(surface_size.0, scale.0);
    let mut height = scale_axis(surface_size.1, scale.1);

    if is_subsurface && (width > clip.0 || height > clip.1) {
        return BufferScale::Skip;
    }

    width = width.min(clip.0);
    height = height.min(clip.1);

    if width > 0 && height > 0 {
        BufferScale::Resize { width, height }
    } else {
        BufferScale::Unchanged
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: Rect = Rect::new(0, 0, 1920, 1080);

    #[test]
    fn test_corner_location_inside_monitor() {
        let corners = corner_location(Rect::new(100, 100, 800, 600), MONITOR, 10);
        assert_eq!(corners, CornerLocation::ALL);
    }

    #[test]
    fn test_corner_location_pinned_edges() {
        let left_half = Rect::new(0, 0, 960, 1080);
        assert_eq!(corner_location(left_half, MONITOR, 0), CornerLocation::empty());
        assert_eq!(corner_location(left_half, MONITOR, 10), CornerLocation::ALL);

        let top_strip = Rect::new(100, -10, 800, 300);
        let corners = corner_location(top_strip, MONITOR, 10);
        assert_eq!(corners, CornerLocation::BOTTOM);
    }

    #[test]
    fn test_corner_location_is_idempotent() {
        let target = Rect::new(1510, 200, 420, 300);
        let first = corner_location(target, MONITOR, 8);
        assert_eq!(first, corner_location(target, MONITOR, 8));
        assert_eq!(first, CornerLocation::LEFT);
    }

    #[test]
    fn test_edge_offsets_overflow() {
        let out = EdgeOffsets::overflow(Rect::new(-50, 1000, 200, 200), MONITOR);
        assert_eq!(
            out,
            EdgeOffsets {
                left: 50,
                right: 0,
                top: 0,
                bottom: 120
            }
        );
        assert_eq!(EdgeOffsets::for_client(Rect::new(-50, 0, 10, 10), MONITOR, true), EdgeOffsets::ZERO);
    }

    #[test]
    fn test_trim_offscreen_left() {
        let animated = Rect::new(-100, 0, 400, 300);
        let mut clip = Rect::new(0, 0, 396, 296);
        let trim = trim_offscreen(animated, MONITOR, 4, &mut clip);

        assert_eq!(trim, ClipTrim { x: 96, y: 0, width: 0, height: 0 });
        assert_eq!(clip, Rect::new(96, 0, 300, 296));
        assert!(!is_clipped_away(clip, 4));
    }

    #[test]
    fn test_trim_offscreen_border_only_keeps_clip() {
        let animated = Rect::new(1920 - 400 + 3, 0, 400, 300);
        let mut clip = Rect::new(0, 0, 396, 296);
        let trim = trim_offscreen(animated, MONITOR, 4, &mut clip);

        assert_eq!(trim, ClipTrim::default());
        assert_eq!(clip, Rect::new(0, 0, 396, 296));
    }

    #[test]
    fn test_trim_offscreen_fully_outside() {
        let animated = Rect::new(2000, 0, 400, 300);
        let mut clip = Rect::new(0, 0, 396, 296);
        let _ = trim_offscreen(animated, MONITOR, 4, &mut clip);

        assert!(is_clipped_away(clip, 4));
    }

    #[test]
    fn test_trim_offscreen_is_idempotent_for_same_input() {
        let animated = Rect::new(-30, -40, 400, 300);
        let mut a = Rect::new(0, 0, 396, 296);
        let mut b = a;
        assert_eq!(
            trim_offscreen(animated, MONITOR, 4, &mut a),
            trim_offscreen(animated, MONITOR, 4, &mut b)
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_border_layout_on_screen() {
        let layout = border_layout(Rect::new(100, 100, 800, 600), 4, EdgeOffsets::ZERO);
        assert_eq!(layout.rect, Rect::new(0, 0, 800, 600));
        assert_eq!(layout.inner, Rect::new(4, 4, 792, 592));
    }

    #[test]
    fn test_border_layout_partially_offscreen() {
        let animated = Rect::new(-100, 0, 800, 600);
        let offsets = EdgeOffsets::overflow(animated, MONITOR);
        let layout = border_layout(animated, 4, offsets);

        assert_eq!(layout.rect, Rect::new(100, 0, 700, 600));
        assert_eq!(layout.inner.x, 0);
        assert_eq!(layout.inner.width, 792 - 100 + 4);
    }

    #[test]
    fn test_border_layout_never_negative() {
        let layout = border_layout(Rect::new(0, 0, 4, 4), 4, EdgeOffsets::ZERO);
        assert_eq!(layout.inner.width, 0);
        assert_eq!(layout.inner.height, 0);
    }

    #[test]
    fn test_shadow_layout_on_screen() {
        let params = ShadowParams {
            size: 10,
            offset_x: 0,
            offset_y: 0,
        };
        let layout = shadow_layout(Rect::new(100, 100, 804, 604), 4, 0, params, Some(MONITOR));

        assert_eq!(layout.position, (0, 0));
        assert_eq!(layout.size, (800 + 28, 600 + 28));
        assert_eq!(layout.clip, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn test_shadow_layout_clamped_to_monitor() {
        let params = ShadowParams {
            size: 10,
            offset_x: 0,
            offset_y: 0,
        };
        let layout = shadow_layout(Rect::new(-20, 0, 204, 104), 4, 0, params, Some(MONITOR));
        assert_eq!(layout.position, (20, 0));
        assert_eq!(layout.size, (228 - 20, 128));
        assert_eq!(layout.clip.x, -20);

        let grabbed = shadow_layout(Rect::new(-20, 0, 204, 104), 4, 0, params, None);
        assert_eq!(grabbed.position, (0, 0));
        assert_eq!(grabbed.size, (228, 128));
    }

    #[test]
    fn test_should_scale_literal_checks() {
        assert!(!should_scale(0.5, 0.5));
        assert!(!should_scale(0.5, 1.0));
        assert!(!should_scale(1.0, 0.5));
        assert!(should_scale(1.0, 1.0));
        assert!(should_scale(1.5, 0.5));
        assert!(should_scale(0.9, 1.2));
    }

    #[test]
    fn test_scaled_buffer_size() {
        assert_eq!(
            scaled_buffer_size((400, 300), (1.5, 1.0), (550, 300), false),
            BufferScale::Resize { width: 550, height: 300 }
        );
        assert_eq!(
            scaled_buffer_size((400, 300), (0.5, 2.0), (200, 600), false),
            BufferScale::Resize { width: 200, height: 600 }
        );
        assert_eq!(
            scaled_buffer_size((400, 300), (2.0, 1.0), (500, 300), true),
            BufferScale::Skip
        );
        assert_eq!(scaled_buffer_size((0, 300), (1.0, 1.0), (500, 300), false), BufferScale::Unchanged);
    }
}

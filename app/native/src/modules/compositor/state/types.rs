//! Core state types for the animation engine.
//!
//! These types form a relational structure:
//! - `Monitor` represents an output with its logical and window-area boxes
//! - `Client` represents a mapped window and owns its animation sub-state
//!
//! Relations:
//! - `Client.monitor` → `Monitor.id`
//! - `Client.swallowed_by` / `Client.swallowing` → `Client.id`

use std::fmt;

use serde::{Deserialize, Serialize};

use super::animation::ClientAnimation;
use crate::config::AnimationType;
use crate::modules::compositor::geometry::CornerLocation;
use crate::modules::compositor::scene::NodeId;

// ============================================================================
// Geometry Types
// ============================================================================

/// An integer rectangle in layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a zero-sized rectangle at origin.
    #[must_use]
    pub const fn zero() -> Self { Self::new(0, 0, 0, 0) }

    /// Check if this rectangle has a positive area.
    #[must_use]
    pub const fn is_valid(&self) -> bool { self.width > 0 && self.height > 0 }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 { self.x + self.width }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 { self.y + self.height }

    /// Check if this rectangle contains a point.
    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the overlapping area, or a zero box when the rectangles do not overlap.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.is_valid() || !other.is_valid() {
            return Self::zero();
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= x || bottom <= y {
            return Self::zero();
        }

        Self::new(x, y, right - x, bottom - y)
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if !self.is_valid() {
            return *other;
        }
        if !other.is_valid() {
            return *self;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Get the center point of this rectangle.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Returns the rectangle moved by the given offset.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Stable handle of a mapped client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "client#{}", self.0) }
}

/// Stable handle of a monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(pub u32);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "monitor#{}", self.0) }
}

// ============================================================================
// Monitor Type
// ============================================================================

/// Layout family of a monitor, as far as animations care.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Any layout that keeps windows inside the window area.
    #[default]
    Tiling,
    /// Horizontally scrolling layout; windows may extend past the monitor.
    Scroller,
}

/// An output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: MonitorId,

    /// Output name (e.g., "DP-1").
    pub name: String,

    /// Full logical box of the output.
    pub frame: Rect,

    /// Usable area for windows (excluding bars and panels).
    pub window_area: Rect,

    /// Duration of one output frame in milliseconds.
    pub frame_period_ms: u32,

    /// Current layout family.
    pub layout: LayoutKind,

    /// Bitmask of visible tags.
    pub tagset: u32,

    /// The focused client on this monitor.
    pub selection: Option<ClientId>,
}

impl Monitor {
    /// Create a monitor whose window area equals its frame, showing tag 1.
    #[must_use]
    pub fn new(id: MonitorId, name: impl Into<String>, frame: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            frame,
            window_area: frame,
            frame_period_ms: 16,
            layout: LayoutKind::Tiling,
            tagset: 1,
            selection: None,
        }
    }

    /// Returns the geometry snapshot handed to per-client derivations.
    #[must_use]
    pub const fn geometry(&self) -> MonitorGeometry {
        MonitorGeometry {
            id: self.id,
            frame: self.frame,
            window_area: self.window_area,
            frame_period_ms: self.frame_period_ms,
            layout: self.layout,
        }
    }
}

/// Copyable subset of [`Monitor`] used while a client is borrowed mutably.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorGeometry {
    pub id: MonitorId,
    pub frame: Rect,
    pub window_area: Rect,
    pub frame_period_ms: u32,
    pub layout: LayoutKind,
}

// ============================================================================
// Client Types
// ============================================================================

/// Window state flags maintained by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // Window state naturally has many boolean flags
pub struct ClientFlags {
    pub floating: bool,
    pub fullscreen: bool,
    pub minimized: bool,
    /// The client was asked to close and is waiting to unmap.
    pub killing: bool,
    pub urgent: bool,
    pub scratchpad: bool,
    /// Visible on every tag.
    pub global: bool,
    /// Just left the global state.
    pub unglobal: bool,
    /// Kept above every other window.
    pub overlay: bool,
}

/// Per-client overrides from window rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClientRules {
    pub open_type: Option<AnimationType>,
    pub close_type: Option<AnimationType>,
    pub no_fade_in: bool,
    pub no_fade_out: bool,
    pub no_border: bool,
    pub focused_opacity: Option<f32>,
    pub unfocused_opacity: Option<f32>,
}

/// Scene nodes owned by a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientNodes {
    /// Root tree, positioned at the animated box.
    pub root: NodeId,
    pub border: NodeId,
    pub shadow: NodeId,
    /// Tree holding the client's surface buffers, inset by the border width.
    pub surface: NodeId,
}

/// Everything the host supplies when a window maps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientSpec {
    pub monitor: Option<MonitorId>,
    pub tags: u32,
    pub flags: ClientFlags,
    pub rules: ClientRules,
    /// Committed surface geometry (offset of the window inside its buffer and size).
    pub surface: Rect,
    pub is_x11: bool,
    /// Override-redirect style client that is never animated on close.
    pub unmanaged: bool,
}

/// A mapped window.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Client {
    pub id: ClientId,
    pub monitor: MonitorId,
    pub tags: u32,
    pub flags: ClientFlags,
    pub rules: ClientRules,
    pub is_x11: bool,
    pub unmanaged: bool,

    /// Authoritative box, set by layout.
    pub geom: Rect,
    /// Last committed target.
    pub current: Rect,
    /// Next target; becomes `current` on commit.
    pub pending: Rect,
    /// Start box of the next transition.
    pub animainit_geom: Rect,
    /// Committed surface geometry reported by the client.
    pub surface: Rect,

    pub animation: ClientAnimation,

    /// Current border width.
    pub bw: i32,
    /// Border hidden by policy while `bw` may still be non-zero.
    pub fake_no_border: bool,
    pub corners: CornerLocation,
    pub is_clip_to_hide: bool,
    pub is_pending_open_animation: bool,
    pub need_output_flush: bool,
    /// The close transition was already handed to the fade-out layer.
    pub is_closing: bool,

    pub swallowed_by: Option<ClientId>,
    pub swallowing: Option<ClientId>,

    pub nodes: ClientNodes,
}

impl Client {
    /// Create a client from a map request.
    #[must_use]
    pub fn new(id: ClientId, monitor: MonitorId, spec: &ClientSpec, bw: i32, nodes: ClientNodes) -> Self {
        Self {
            id,
            monitor,
            tags: spec.tags,
            flags: spec.flags,
            rules: spec.rules,
            is_x11: spec.is_x11,
            unmanaged: spec.unmanaged,
            geom: Rect::zero(),
            current: Rect::zero(),
            pending: Rect::zero(),
            animainit_geom: Rect::zero(),
            surface: spec.surface,
            animation: ClientAnimation::default(),
            bw,
            fake_no_border: false,
            corners: CornerLocation::ALL,
            is_clip_to_hide: false,
            is_pending_open_animation: true,
            need_output_flush: false,
            is_closing: false,
            swallowed_by: None,
            swallowing: None,
            nodes,
        }
    }

    /// Laid out by the tiler (not floating, minimized, closing or fullscreen).
    #[must_use]
    pub const fn is_tiled(&self) -> bool {
        !self.flags.floating && !self.flags.minimized && !self.flags.killing && !self.flags.fullscreen
    }

    /// Visible on the given tagset.
    #[must_use]
    pub const fn is_visible_on(&self, tagset: u32) -> bool {
        self.flags.global || self.tags & tagset != 0
    }

    /// Effective open animation type after rule overrides.
    #[must_use]
    pub fn open_type(&self, default: AnimationType) -> AnimationType {
        self.rules.open_type.unwrap_or(default)
    }

    /// Effective close animation type after rule overrides.
    #[must_use]
    pub fn close_type(&self, default: AnimationType) -> AnimationType {
        self.rules.close_type.unwrap_or(default)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 60, 100, 100);
        assert_eq!(a.intersection(&b), Rect::new(50, 60, 50, 40));
    }

    #[test]
    fn test_rect_intersection_disjoint_is_zero() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert_eq!(a.intersection(&b), Rect::zero());
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0, 0, 1920, 1080);
        let b = Rect::new(1920, 0, 1280, 1024);
        assert_eq!(a.union(&b), Rect::new(0, 0, 3200, 1080));
        assert_eq!(Rect::zero().union(&b), b);
    }

    #[test]
    fn test_rect_contains_point_and_center() {
        let r = Rect::new(100, 100, 800, 600);
        assert!(r.contains_point(100, 100));
        assert!(!r.contains_point(900, 100));
        assert_eq!(r.center(), (500, 400));
    }

    #[test]
    fn test_rect_display() {
        assert_eq!(Rect::new(1, 2, 30, 40).to_string(), "30x40+1+2");
    }

    #[test]
    fn test_client_visibility_and_tiling() {
        let nodes = ClientNodes {
            root: NodeId(1),
            border: NodeId(2),
            shadow: NodeId(3),
            surface: NodeId(4),
        };
        let spec = ClientSpec { tags: 0b10, ..Default::default() };
        let mut client = Client::new(ClientId(1), MonitorId(0), &spec, 4, nodes);

        assert!(client.is_tiled());
        assert!(client.is_visible_on(0b10));
        assert!(!client.is_visible_on(0b01));

        client.flags.global = true;
        assert!(client.is_visible_on(0b01));

        client.flags.floating = true;
        assert!(!client.is_tiled());
    }

    #[test]
    fn test_client_rule_overrides() {
        let nodes = ClientNodes {
            root: NodeId(1),
            border: NodeId(2),
            shadow: NodeId(3),
            surface: NodeId(4),
        };
        let spec = ClientSpec {
            rules: ClientRules {
                open_type: Some(AnimationType::Zoom),
                ..Default::default()
            },
            ..Default::default()
        };
        let client = Client::new(ClientId(7), MonitorId(0), &spec, 0, nodes);

        assert_eq!(client.open_type(AnimationType::Slide), AnimationType::Zoom);
        assert_eq!(client.close_type(AnimationType::Fade), AnimationType::Fade);
        assert_eq!(client.id.to_string(), "client#7");
    }
}

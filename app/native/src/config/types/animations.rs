//! Window animation configuration types.
//!
//! Controls which transitions animate, how long each action takes, and the
//! cubic-bezier curve used to ease it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Visual style of an open or close animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    /// Slide in from (or out past) the nearest monitor edge.
    #[default]
    Slide,
    /// Grow from (or shrink toward) the window center.
    Zoom,
    /// Opacity-only transition, no motion.
    Fade,
    /// No animation at all.
    None,
}

/// Axis along which windows travel when switching tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TagAnimationDirection {
    /// Windows slide left/right.
    #[default]
    Horizontal,
    /// Windows slide up/down.
    Vertical,
}

/// Four control values `[x1, y1, x2, y2]` of a cubic-bezier easing curve.
///
/// The curve always starts at `(0, 0)` and ends at `(1, 1)`, like CSS
/// `cubic-bezier()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BezierCurve(pub [f64; 4]);

impl Default for BezierCurve {
    fn default() -> Self { Self([0.46, 1.0, 0.29, 0.99]) }
}

impl BezierCurve {
    /// A curve that evaluates to the identity.
    pub const LINEAR: Self = Self([0.0, 0.0, 1.0, 1.0]);
}

/// Per-action animation durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationDurations {
    /// Layout moves and resizes.
    /// Default: 500
    #[serde(rename = "move")]
    pub move_ms: u32,
    /// Window open.
    /// Default: 400
    pub open: u32,
    /// Tag (workspace) switches.
    /// Default: 300
    pub tag: u32,
    /// Window close.
    /// Default: 300
    pub close: u32,
}

impl Default for AnimationDurations {
    fn default() -> Self {
        Self {
            move_ms: 500,
            open: 400,
            tag: 300,
            close: 300,
        }
    }
}

/// Per-action easing curves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationCurves {
    #[serde(rename = "move")]
    pub move_curve: BezierCurve,
    pub open: BezierCurve,
    pub tag: BezierCurve,
    pub close: BezierCurve,
}

/// Animation configuration for window transitions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationsConfig {
    /// Whether window animations are enabled.
    /// Default: true
    pub enabled: bool,

    /// Fade windows in while they open.
    /// Default: true
    pub fade_in: bool,

    /// Fade windows out while they close.
    /// Default: true
    pub fade_out: bool,

    /// Style of the open animation.
    /// Default: "slide"
    pub open_type: AnimationType,

    /// Style of the close animation.
    /// Default: "slide"
    pub close_type: AnimationType,

    /// Axis of tag switch animations.
    /// Default: "horizontal"
    pub tag_direction: TagAnimationDirection,

    /// Size ratio a zoom-open animation starts from.
    /// Default: 0.5
    pub zoom_initial_ratio: f64,

    /// Size ratio a zoom-close animation shrinks to.
    /// Default: 0.8
    pub zoom_end_ratio: f64,

    /// Opacity a fade-in starts at.
    /// Default: 0.5
    pub fadein_begin_opacity: f32,

    /// Opacity a fade-out starts at.
    /// Default: 0.5
    pub fadeout_begin_opacity: f32,

    /// Durations per action.
    pub durations: AnimationDurations,

    /// Easing curves per action.
    pub curves: AnimationCurves,
}

impl Default for AnimationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fade_in: true,
            fade_out: true,
            open_type: AnimationType::Slide,
            close_type: AnimationType::Slide,
            tag_direction: TagAnimationDirection::Horizontal,
            zoom_initial_ratio: 0.5,
            zoom_end_ratio: 0.8,
            fadein_begin_opacity: 0.5,
            fadeout_begin_opacity: 0.5,
            durations: AnimationDurations::default(),
            curves: AnimationCurves::default(),
        }
    }
}

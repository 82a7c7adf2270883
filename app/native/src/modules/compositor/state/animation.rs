//! Per-client animation sub-state.

use serde::{Deserialize, Serialize};

use super::types::Rect;
use crate::config::{AnimationsConfig, BezierCurve};

/// Kind of transition in flight. Selects the curve and duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationAction {
    #[default]
    None,
    Open,
    Close,
    Move,
    Tag,
}

impl AnimationAction {
    /// Easing curve configured for this action. `None` eases like a move.
    #[must_use]
    pub const fn curve(self, config: &AnimationsConfig) -> BezierCurve {
        match self {
            Self::None | Self::Move => config.curves.move_curve,
            Self::Open => config.curves.open,
            Self::Tag => config.curves.tag,
            Self::Close => config.curves.close,
        }
    }

    /// Duration in milliseconds configured for this action.
    #[must_use]
    pub const fn duration_ms(self, config: &AnimationsConfig) -> u32 {
        match self {
            Self::None | Self::Move => config.durations.move_ms,
            Self::Open => config.durations.open,
            Self::Tag => config.durations.tag,
            Self::Close => config.durations.close,
        }
    }
}

/// Where a client stands in a tag switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagPhase {
    /// Not part of a tag switch.
    #[default]
    None,
    /// Sliding in onto a newly shown tag.
    Entering,
    /// Sliding out of a hidden tag.
    Leaving,
    /// Finished sliding out; hidden and suspended.
    Left,
}

impl TagPhase {
    /// Any tag-switch phase is active.
    #[must_use]
    pub const fn is_active(self) -> bool { !matches!(self, Self::None) }
}

/// Number of frames a transition of `duration_ms` spans. Never zero.
#[must_use]
pub const fn frames_for(duration_ms: u32, frame_period_ms: u32) -> u32 {
    let period = if frame_period_ms == 0 { 1 } else { frame_period_ms };
    let frames = duration_ms / period;
    if frames == 0 { 1 } else { frames }
}

/// Transition state owned by each client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientAnimation {
    /// Start box of the running transition.
    pub initial: Rect,
    /// Interpolated box for the current frame.
    pub current: Rect,
    pub action: AnimationAction,
    pub passed_frames: u32,
    pub total_frames: u32,
    pub duration_ms: u32,
    /// Curve captured when the transition started.
    pub curve: BezierCurve,
    pub running: bool,
    pub should_animate: bool,
    pub tag: TagPhase,
}

impl Default for ClientAnimation {
    fn default() -> Self {
        Self {
            initial: Rect::zero(),
            current: Rect::zero(),
            action: AnimationAction::None,
            passed_frames: 0,
            total_frames: 1,
            duration_ms: 0,
            curve: BezierCurve::default(),
            running: false,
            should_animate: false,
            tag: TagPhase::None,
        }
    }
}

impl ClientAnimation {
    /// Normalized progress of the running transition.
    #[must_use]
    pub fn progress(&self) -> f64 { f64::from(self.passed_frames) / f64::from(self.total_frames.max(1)) }

    /// Restart frame counting for a transition on an output with the given frame period.
    pub fn restart(&mut self, frame_period_ms: u32) {
        self.passed_frames = 0;
        self.total_frames = frames_for(self.duration_ms, frame_period_ms);
    }

    /// Step one frame forward, never past the end. Returns the new progress.
    pub fn step(&mut self) -> f64 {
        self.total_frames = self.total_frames.max(1);
        self.passed_frames = (self.passed_frames + 1).min(self.total_frames);
        self.progress()
    }

    /// All frames of the transition have been drawn.
    #[must_use]
    pub const fn is_finished(&self) -> bool { self.passed_frames >= self.total_frames }
}

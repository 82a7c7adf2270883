//! Integration tests for the animation engine.
//!
//! Drives `AnimationEngine` through its public API against the in-memory
//! scene arena, the way a compositor would: map, resize, draw frames until
//! idle, unmap.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p glide --test animation_integration
//! ```

use std::sync::Arc;

use glide_lib::config::{AnimationType, BezierCurve, GlideConfig};
use glide_lib::error::GlideError;
use glide_lib::modules::compositor::{
    AnimationEngine, ClientId, ClientSpec, CompositorEffect, Layer, LayoutKind, Monitor, MonitorId,
    Rect, SceneArena, SceneGraph, SurfaceInfo, SurfaceRole, SwitchDirection, TagPhase,
};

const MONITOR: MonitorId = MonitorId(0);
const FRAME: Rect = Rect::new(0, 0, 1920, 1080);
const WINDOW: Rect = Rect::new(100, 100, 800, 600);

// ============================================================================
// Harness
// ============================================================================

/// An engine on a single 1920x1080 monitor that records every host effect.
struct Harness {
    engine: AnimationEngine<SceneArena>,
    effects: Vec<CompositorEffect>,
}

impl Harness {
    fn new(config: GlideConfig) -> Self {
        let mut engine = AnimationEngine::new(SceneArena::new(), Arc::new(config));
        engine
            .add_monitor(Monitor::new(MONITOR, "eDP-1", FRAME))
            .expect("valid monitor");
        Self { engine, effects: Vec::new() }
    }

    /// Maps a client with one toplevel buffer, without laying it out.
    fn map(&mut self) -> ClientId {
        let id = self
            .engine
            .map_client(ClientSpec {
                monitor: Some(MONITOR),
                tags: 1,
                surface: Rect::new(0, 0, 792, 592),
                ..ClientSpec::default()
            })
            .expect("known monitor");
        let surface = self.engine.client(id).expect("mapped").nodes.surface;
        self.engine
            .scene_mut()
            .add_buffer(surface, SurfaceInfo::new(SurfaceRole::Toplevel, 792, 592));
        id
    }

    /// Maps a client, lays it out at `target` and lets the open transition finish.
    fn open(&mut self, target: Rect) -> ClientId {
        let id = self.map();
        self.engine.resize(id, target, false);
        self.settle();
        id
    }

    fn collect(&mut self) -> bool {
        let drained = self.engine.take_effects();
        let requested = drained
            .iter()
            .any(|effect| matches!(effect, CompositorEffect::RequestFrame { monitor } if *monitor == MONITOR));
        self.effects.extend(drained);
        requested
    }

    /// Draws one frame.
    fn frame(&mut self) {
        self.collect();
        self.engine.on_frame(MONITOR);
    }

    /// Draws frames while any are requested. Returns the number drawn.
    fn settle(&mut self) -> u32 {
        let mut frames = 0;
        while self.collect() {
            self.engine.on_frame(MONITOR);
            frames += 1;
            assert!(frames < 1_000, "scene never settled");
        }
        frames
    }

    fn saw(&self, effect: CompositorEffect) -> bool { self.effects.contains(&effect) }
}

fn requests_frame(effects: &[CompositorEffect]) -> bool {
    effects
        .iter()
        .any(|effect| matches!(effect, CompositorEffect::RequestFrame { .. }))
}

// ============================================================================
// Open
// ============================================================================

#[test]
fn test_new_master_slides_in_from_left() {
    let mut harness = Harness::new(GlideConfig::default());
    harness.open(Rect::new(960, 0, 960, 1080));

    let id = harness.map();
    harness.engine.resize(id, WINDOW, false);

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animainit_geom, Rect::new(-800, 100, 800, 600));
    assert_eq!(client.animation.initial, client.animainit_geom);
    assert_eq!(client.animation.total_frames, 25);

    harness.frame();
    let x = harness.engine.client(id).expect("client").animation.current.x;
    assert!(-800 < x && x < 100, "first frame at x = {x}");

    for _ in 1..25 {
        harness.frame();
    }
    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animation.current, WINDOW);
    assert!(!client.animation.running);
}

#[test]
fn test_single_tile_rises_from_below() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.map();
    harness.engine.resize(id, WINDOW, false);

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animainit_geom, Rect::new(100, 1080, 800, 600));
}

#[test]
fn test_zoom_open_starts_centred() {
    let mut config = GlideConfig::default();
    config.animations.open_type = AnimationType::Zoom;
    let mut harness = Harness::new(config);

    let id = harness.map();
    harness.engine.resize(id, WINDOW, false);

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animainit_geom, Rect::new(300, 250, 400, 300));
}

#[test]
fn test_frame_counters_stay_in_range() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.map();
    harness.engine.resize(id, WINDOW, false);

    while harness.engine.is_animating(id) {
        harness.frame();
        let animation = &harness.engine.client(id).expect("client").animation;
        assert!(animation.total_frames >= 1);
        assert!(animation.passed_frames <= animation.total_frames);
    }
    assert_eq!(harness.engine.client(id).expect("client").animation.current, WINDOW);
}

#[test]
fn test_resize_requests_configure() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.map();
    harness.engine.resize(id, WINDOW, false);
    harness.settle();

    assert!(harness.saw(CompositorEffect::ConfigureSize {
        client: id,
        width: 792,
        height: 592,
    }));
}

// ============================================================================
// Move
// ============================================================================

#[test]
fn test_retarget_restarts_from_current_box() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);

    harness.engine.resize(id, Rect::new(960, 0, 960, 1080), false);
    for _ in 0..3 {
        harness.frame();
    }
    let on_screen = harness.engine.client(id).expect("client").animation.current;

    harness.engine.resize(id, Rect::new(0, 0, 960, 1080), false);
    let animation = &harness.engine.client(id).expect("client").animation;
    assert_eq!(animation.passed_frames, 0);
    assert_eq!(animation.initial, on_screen);
    assert!(animation.running);

    harness.settle();
    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animation.current, Rect::new(0, 0, 960, 1080));
}

#[test]
fn test_grabbed_client_follows_without_animation() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);

    harness.engine.set_grabbed(Some(id));
    let target = Rect::new(300, 200, 640, 480);
    harness.engine.resize(id, target, true);

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.geom, target);
    assert_eq!(client.current, target);
    assert_eq!(client.pending, target);
    assert_eq!(client.animainit_geom, target);
    assert_eq!(client.animation.current, target);
    assert!(!client.animation.running);
    assert!(!requests_frame(harness.engine.pending_effects()));

    let root = harness.engine.scene().node(client.nodes.root).expect("root");
    assert_eq!(root.position, (300, 200));
}

#[test]
fn test_disabled_animations_snap_immediately() {
    let mut config = GlideConfig::default();
    config.animations.enabled = false;
    let mut harness = Harness::new(config);

    let id = harness.map();
    harness.engine.resize(id, WINDOW, false);

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animation.current, client.geom);
    assert!(!harness.engine.is_animating(id));
    assert!(!requests_frame(harness.engine.pending_effects()));
    let root = harness.engine.scene().node(client.nodes.root).expect("root");
    assert_eq!(root.position, (100, 100));
}

#[test]
fn test_unchanged_geometry_does_not_animate() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);

    harness.engine.resize(id, WINDOW, false);

    assert!(!harness.engine.is_animating(id));
    assert!(!requests_frame(harness.engine.pending_effects()));
}

#[test]
fn test_overshooting_curve_never_inverts_box() {
    let mut config = GlideConfig::default();
    config.animations.curves.move_curve = BezierCurve([0.34, 1.56, 0.64, 1.0]);
    let mut harness = Harness::new(config);
    let id = harness.open(Rect::new(0, 0, 1900, 1060));

    let target = Rect::new(100, 100, 100, 100);
    harness.engine.resize(id, target, false);
    while harness.engine.is_animating(id) {
        harness.frame();
        let animated = harness.engine.client(id).expect("client").animation.current;
        assert!(animated.width >= 0, "width {}", animated.width);
        assert!(animated.height >= 0, "height {}", animated.height);
    }
    assert_eq!(harness.engine.client(id).expect("client").animation.current, target);
}

#[test]
fn test_growing_window_scales_buffer_until_done() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);
    let surface = harness.engine.client(id).expect("client").nodes.surface;
    let buffer = harness.engine.scene().buffers(surface)[0].id;

    harness.engine.resize(id, Rect::new(0, 0, 1600, 1000), false);
    for _ in 0..3 {
        harness.frame();
    }
    let animated = harness.engine.client(id).expect("client").animation.current;
    let (width, height) = harness
        .engine
        .scene()
        .buffer(buffer)
        .and_then(|state| state.dest_size)
        .expect("scaled mid-transition");
    assert!(width > 792 && width <= animated.width - 8, "width {width}");
    assert!(height > 592 && height <= animated.height - 8, "height {height}");

    harness.settle();
    let state = harness.engine.scene().buffer(buffer).expect("buffer");
    assert_eq!(state.dest_size, Some((792, 592)));
}

#[test]
fn test_hovered_focus_is_renotified_on_completion() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);
    harness.engine.set_focus(Some(id));
    harness.engine.set_pointer_client(Some(id));
    harness.effects.clear();

    harness.engine.resize(id, Rect::new(960, 0, 960, 1080), false);
    harness.frame();
    assert!(!harness.saw(CompositorEffect::PointerEnter { client: id }));

    harness.settle();
    assert!(harness.saw(CompositorEffect::PointerEnter { client: id }));
}

#[test]
fn test_unfocused_hover_is_not_renotified() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);
    harness.engine.set_pointer_client(Some(id));
    harness.effects.clear();

    harness.engine.resize(id, Rect::new(960, 0, 960, 1080), false);
    harness.settle();
    assert!(!harness.saw(CompositorEffect::PointerEnter { client: id }));
}

#[test]
fn test_swallowed_child_opens_from_terminal() {
    let mut harness = Harness::new(GlideConfig::default());
    let terminal = harness.open(WINDOW);
    let child = harness.map();
    assert!(harness.engine.set_swallow(terminal, child));

    let target = Rect::new(960, 0, 960, 1080);
    harness.engine.resize(child, target, false);
    let client = harness.engine.client(child).expect("client");
    assert_eq!(client.animainit_geom, WINDOW);
    assert_eq!(client.animation.initial, WINDOW);

    harness.settle();
    assert_eq!(harness.engine.client(child).expect("client").animation.current, target);
}

#[test]
fn test_swallowing_terminal_starts_at_target() {
    let mut harness = Harness::new(GlideConfig::default());
    let terminal = harness.open(WINDOW);
    let child = harness.open(Rect::new(960, 0, 960, 1080));
    assert!(harness.engine.set_swallow(terminal, child));

    let target = Rect::new(0, 0, 960, 1080);
    harness.engine.resize(terminal, target, false);
    let client = harness.engine.client(terminal).expect("client");
    assert_eq!(client.animainit_geom, target);
    assert_eq!(client.animation.initial, target);
}

#[test]
fn test_offscreen_tile_is_hidden_and_shown_again() {
    let mut harness = Harness::new(GlideConfig::default());
    harness
        .engine
        .set_monitor_layout(MONITOR, LayoutKind::Scroller)
        .expect("known monitor");
    let id = harness.open(WINDOW);
    let root = harness.engine.client(id).expect("client").nodes.root;

    harness.engine.resize(id, Rect::new(2500, 100, 800, 600), false);
    harness.settle();
    assert!(harness.engine.client(id).expect("client").is_clip_to_hide);
    assert!(!harness.engine.scene().is_visible(root));

    harness.engine.resize(id, WINDOW, false);
    harness.settle();
    assert!(!harness.engine.client(id).expect("client").is_clip_to_hide);
    assert!(harness.engine.scene().is_visible(root));
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_tag_switch_out_and_back() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);
    let root = harness.engine.client(id).expect("client").nodes.root;

    harness.engine.set_monitor_tagset(MONITOR, 1 << 1).expect("known monitor");
    assert!(harness.engine.tag_out(id, SwitchDirection::Next));
    assert_eq!(harness.engine.client(id).expect("client").current, Rect::new(-1820, 100, 800, 600));
    harness.settle();

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animation.tag, TagPhase::Left);
    assert_eq!(client.geom, WINDOW);
    assert!(!harness.engine.scene().is_visible(root));
    assert!(harness.saw(CompositorEffect::SetSuspended { client: id, suspended: true }));

    harness.engine.set_monitor_tagset(MONITOR, 1).expect("known monitor");
    assert!(harness.engine.tag_in(id, WINDOW, SwitchDirection::Next));
    assert_eq!(
        harness.engine.client(id).expect("client").animation.initial,
        Rect::new(2020, 100, 800, 600)
    );
    harness.settle();

    let client = harness.engine.client(id).expect("client");
    assert_eq!(client.animation.tag, TagPhase::None);
    assert_eq!(client.animation.current, WINDOW);
    assert!(harness.engine.scene().is_visible(root));
    assert!(harness.saw(CompositorEffect::SetSuspended { client: id, suspended: false }));
}

// ============================================================================
// Close
// ============================================================================

#[test]
fn test_fade_close_ramps_opacity_to_zero() {
    let mut config = GlideConfig::default();
    config.animations.close_type = AnimationType::Fade;
    config.animations.durations.close = 160;
    let mut harness = Harness::new(config);
    let id = harness.open(WINDOW);
    let root = harness.engine.client(id).expect("client").nodes.root;

    assert!(harness.engine.unmap_client(id));
    assert!(harness.engine.client(id).is_none());
    assert!(!harness.engine.scene().contains(root));

    let fade = harness.engine.fade_outs()[0].clone();
    assert_eq!(fade.target, Rect::zero());
    assert_eq!(fade.animation.total_frames, 10);

    for _ in 0..5 {
        harness.frame();
    }
    let buffers = harness.engine.scene().buffers(fade.node);
    assert!(!buffers.is_empty());
    for buffer in buffers {
        let state = harness.engine.scene().buffer(buffer.id).expect("buffer");
        assert!(state.opacity.abs() < f32::EPSILON, "opacity {}", state.opacity);
    }

    harness.settle();
    assert_eq!(harness.engine.fade_out_count(), 0);
    assert!(!harness.engine.scene().contains(fade.node));
}

#[test]
fn test_slide_close_leaves_through_top_edge() {
    let mut config = GlideConfig::default();
    config.animations.close_type = AnimationType::Slide;
    let mut harness = Harness::new(config);
    let id = harness.open(WINDOW);

    assert!(harness.engine.unmap_client(id));
    let fade = harness.engine.fade_outs()[0].clone();
    assert_eq!(fade.target, Rect::new(0, -700, 800, 600));

    for _ in 0..3 {
        harness.frame();
    }
    let current = harness.engine.fade_outs()[0].animation.current;
    assert!(-700 < current.y && current.y < 0, "y = {}", current.y);
    assert_eq!(current.x, 0);

    harness.settle();
    assert_eq!(harness.engine.fade_out_count(), 0);
    assert!(!harness.engine.scene().contains(fade.node));
}

#[test]
fn test_zoom_close_shrinks_snapshot_buffers() {
    let mut config = GlideConfig::default();
    config.animations.close_type = AnimationType::Zoom;
    let mut harness = Harness::new(config);
    let id = harness.open(WINDOW);

    assert!(harness.engine.unmap_client(id));
    let fade = harness.engine.fade_outs()[0].clone();
    assert_eq!(fade.target, Rect::new(80, 60, 640, 480));

    for _ in 0..3 {
        harness.frame();
    }
    let current = harness.engine.fade_outs()[0].animation.current;
    assert!(640 < current.width && current.width < 800, "width = {}", current.width);

    let buffers = harness.engine.scene().buffers(fade.node);
    assert!(!buffers.is_empty());
    for buffer in buffers {
        let state = harness.engine.scene().buffer(buffer.id).expect("buffer");
        assert_eq!(state.dest_size, Some((current.width, current.height)));
    }

    harness.settle();
    assert_eq!(harness.engine.fade_out_count(), 0);
}

#[test]
fn test_close_is_handed_over_once() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);

    assert!(harness.engine.init_close(id));
    assert!(!harness.engine.init_close(id));
    assert!(harness.engine.unmap_client(id));
    assert_eq!(harness.engine.fade_out_count(), 1);
    assert_eq!(harness.engine.scene().layer(Layer::FadeOut).len(), 1);

    harness.settle();
    assert_eq!(harness.engine.fade_out_count(), 0);
}

#[test]
fn test_snapshot_failure_drops_close_animation() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);
    let root = harness.engine.client(id).expect("client").nodes.root;

    harness.engine.scene_mut().set_snapshot_failure(true);
    assert!(harness.engine.unmap_client(id));

    assert_eq!(harness.engine.fade_out_count(), 0);
    assert!(!harness.engine.scene().contains(root));
}

#[test]
fn test_none_close_type_skips_snapshot() {
    let mut config = GlideConfig::default();
    config.animations.close_type = AnimationType::None;
    let mut harness = Harness::new(config);
    let id = harness.open(WINDOW);

    assert!(!harness.engine.init_close(id));
    assert!(harness.engine.unmap_client(id));
    assert_eq!(harness.engine.fade_out_count(), 0);
}

// ============================================================================
// Configuration And Boundaries
// ============================================================================

#[test]
fn test_reconfigure_keeps_running_curve() {
    let mut harness = Harness::new(GlideConfig::default());
    let id = harness.open(WINDOW);

    harness.engine.resize(id, Rect::new(960, 0, 960, 1080), false);
    let started = harness.engine.client(id).expect("client").animation.clone();

    let mut config = GlideConfig::default();
    config.animations.curves.move_curve = BezierCurve::LINEAR;
    config.animations.durations.move_ms = 1000;
    harness.engine.reconfigure(Arc::new(config));

    let running = &harness.engine.client(id).expect("client").animation;
    assert_eq!(running.curve, started.curve);
    assert_eq!(running.total_frames, started.total_frames);

    harness.settle();
    harness.engine.resize(id, WINDOW, false);
    let next = &harness.engine.client(id).expect("client").animation;
    assert_eq!(next.curve, BezierCurve::LINEAR);
    assert_eq!(next.total_frames, 62);
}

#[test]
fn test_unknown_clients_are_ignored() {
    let mut harness = Harness::new(GlideConfig::default());
    let ghost = ClientId(99);

    assert!(!harness.engine.resize(ghost, WINDOW, false));
    assert!(!harness.engine.advance_frame(ghost));
    assert!(!harness.engine.tag_in(ghost, WINDOW, SwitchDirection::Next));
    assert!(!harness.engine.tag_out(ghost, SwitchDirection::Next));
    assert!(!harness.engine.init_close(ghost));
    assert!(!harness.engine.unmap_client(ghost));
    assert!(!harness.engine.is_animating(ghost));
    assert!(harness.engine.take_effects().is_empty());
}

#[test]
fn test_map_on_unknown_monitor_fails() {
    let mut harness = Harness::new(GlideConfig::default());
    let result = harness.engine.map_client(ClientSpec {
        monitor: Some(MonitorId(7)),
        ..ClientSpec::default()
    });
    assert!(matches!(result, Err(GlideError::UnknownMonitor(_))));
}

#[test]
fn test_empty_monitor_is_rejected() {
    let mut harness = Harness::new(GlideConfig::default());
    let result = harness
        .engine
        .add_monitor(Monitor::new(MonitorId(1), "HDMI-1", Rect::new(1920, 0, 0, 1080)));
    assert!(matches!(result, Err(GlideError::InvalidArguments(_))));
}

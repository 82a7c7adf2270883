//! Scripted demo scene.
//!
//! Plays a short session on a virtual monitor: two windows open, one is
//! retargeted mid-flight, the tag is switched away and back, and a window
//! closes. Frames are drawn until the scene is idle after each step.

use std::sync::Arc;

use crate::config::GlideConfig;
use crate::error::GlideError;
use crate::modules::compositor::{
    AnimationEngine, ClientId, ClientSpec, CompositorEffect, Monitor, MonitorId, Rect, SceneArena,
    SurfaceInfo, SurfaceRole, SwitchDirection,
};

const MONITOR: MonitorId = MonitorId(0);
const FRAME: Rect = Rect::new(0, 0, 1920, 1080);

type DemoEngine = AnimationEngine<SceneArena>;

/// Runs the demo scene.
///
/// # Errors
///
/// Returns an error if the virtual monitor or a window cannot be set up.
pub fn run(config: Arc<GlideConfig>, max_frames: u32) -> Result<(), GlideError> {
    let mut engine = AnimationEngine::new(SceneArena::new(), config);
    engine.add_monitor(Monitor::new(MONITOR, "DEMO-1", FRAME))?;

    let first = open_window(&mut engine)?;
    engine.set_focus(Some(first));
    engine.resize(first, FRAME, false);
    step(&mut engine, "open first window", max_frames);

    let second = open_window(&mut engine)?;
    engine.set_focus(Some(second));
    engine.resize(second, Rect::new(0, 0, 960, 1080), false);
    engine.resize(first, Rect::new(960, 0, 960, 1080), false);
    step(&mut engine, "open second window", max_frames.min(5));

    // Retarget while the first window is still moving.
    engine.resize(first, Rect::new(960, 540, 960, 540), false);
    step(&mut engine, "retarget first window", max_frames);

    engine.set_monitor_tagset(MONITOR, 1 << 1)?;
    for id in [first, second] {
        engine.tag_out(id, SwitchDirection::Next);
    }
    step(&mut engine, "leave tag", max_frames);

    engine.set_monitor_tagset(MONITOR, 1)?;
    engine.tag_in(second, Rect::new(0, 0, 960, 1080), SwitchDirection::Previous);
    engine.tag_in(first, Rect::new(960, 540, 960, 540), SwitchDirection::Previous);
    step(&mut engine, "return to tag", max_frames);

    engine.unmap_client(second);
    engine.set_focus(Some(first));
    engine.resize(first, FRAME, false);
    step(&mut engine, "close second window", max_frames);

    report(&engine);
    Ok(())
}

/// Maps a window on the demo monitor and attaches a surface buffer to it.
fn open_window(engine: &mut DemoEngine) -> Result<ClientId, GlideError> {
    let surface = Rect::new(0, 0, 952, 1072);
    let id = engine.map_client(ClientSpec {
        monitor: Some(MONITOR),
        tags: 1,
        surface,
        ..ClientSpec::default()
    })?;

    let node = engine.client(id).map(|client| client.nodes.surface).ok_or("client vanished after mapping")?;
    engine
        .scene_mut()
        .add_buffer(node, SurfaceInfo::new(SurfaceRole::Toplevel, surface.width, surface.height));
    Ok(id)
}

/// Draws frames until nothing requests another one. Returns the frame count.
fn step(engine: &mut DemoEngine, label: &str, max_frames: u32) -> u32 {
    let mut frames = 0;

    while frames < max_frames {
        let effects = engine.take_effects();
        let mut requested = false;
        for effect in &effects {
            match effect {
                CompositorEffect::RequestFrame { monitor } => requested |= *monitor == MONITOR,
                other => tracing::debug!(effect = ?other, "host effect"),
            }
        }
        if !requested {
            break;
        }

        engine.on_frame(MONITOR);
        frames += 1;
    }

    tracing::info!(step = label, frames, animating = engine.is_monitor_animating(MONITOR), "step done");
    frames
}

fn report(engine: &DemoEngine) {
    for client in engine.clients() {
        tracing::info!(
            client = %client.id,
            geom = %client.geom,
            animated = %client.animation.current,
            tag = ?client.animation.tag,
            "client state"
        );
    }

    tracing::info!(
        nodes = engine.scene().len(),
        fade_outs = engine.fade_out_count(),
        commands = engine.scene().commands().len(),
        "scene state"
    );
}

//! The animation engine.
//!
//! Owns monitors, clients and closing snapshots, and drives them through a
//! [`SceneGraph`]. Every entry point taking a client handle tolerates unknown
//! handles by returning `false` without side effects.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::effects::animation::fadeout::FadeOutClient;
use super::effects::animation::transition::{SwitchDirection, leave_offset};
use super::effects::animation::{advance_frame, draw_frame, resize};
use super::effects::decoration::{border_px, refresh_border_color};
use super::effects::{ClientContext, CompositorEffect, EffectQueue};
use super::scene::{Layer, NodeKind, Parent, SceneGraph};
use super::state::{
    Client, ClientFlags, ClientId, ClientNodes, ClientSpec, LayoutKind, Monitor, MonitorId, Rect,
    TagPhase,
};
use crate::config::GlideConfig;
use crate::error::GlideError;

/// Per-window animation and decoration engine.
///
/// Single-threaded: the host calls into it from its event loop and from each
/// monitor's frame callback, then drains [`CompositorEffect`]s.
pub struct AnimationEngine<S: SceneGraph> {
    config: Arc<GlideConfig>,
    scene: S,
    monitors: BTreeMap<MonitorId, Monitor>,
    clients: BTreeMap<ClientId, Client>,
    fade_outs: Vec<FadeOutClient>,
    effects: EffectQueue,
    next_client: u64,
    focused_monitor: Option<MonitorId>,
    grabbed: Option<ClientId>,
    pointer: Option<ClientId>,
}

impl<S: SceneGraph> AnimationEngine<S> {
    /// Creates an engine drawing into `scene`.
    #[must_use]
    pub fn new(scene: S, config: Arc<GlideConfig>) -> Self {
        Self {
            config,
            scene,
            monitors: BTreeMap::new(),
            clients: BTreeMap::new(),
            fade_outs: Vec::new(),
            effects: EffectQueue::new(),
            next_client: 1,
            focused_monitor: None,
            grabbed: None,
            pointer: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &GlideConfig { &self.config }

    #[must_use]
    pub const fn scene(&self) -> &S { &self.scene }

    /// Mutable scene access for the host, e.g. to attach surface buffers.
    pub const fn scene_mut(&mut self) -> &mut S { &mut self.scene }

    #[must_use]
    pub fn client(&self, id: ClientId) -> Option<&Client> { self.clients.get(&id) }

    /// All mapped clients, by handle.
    pub fn clients(&self) -> impl Iterator<Item = &Client> { self.clients.values() }

    #[must_use]
    pub fn monitor(&self, id: MonitorId) -> Option<&Monitor> { self.monitors.get(&id) }

    #[must_use]
    pub const fn focused_monitor(&self) -> Option<MonitorId> { self.focused_monitor }

    /// Closing snapshots still animating.
    #[must_use]
    pub fn fade_outs(&self) -> &[FadeOutClient] { &self.fade_outs }

    #[must_use]
    pub fn fade_out_count(&self) -> usize { self.fade_outs.len() }

    /// Effects queued since the last drain, oldest first.
    #[must_use]
    pub fn pending_effects(&self) -> &[CompositorEffect] { self.effects.as_slice() }

    /// Drains the queued effects.
    pub fn take_effects(&mut self) -> Vec<CompositorEffect> { self.effects.drain() }

    /// A client transition is in flight.
    #[must_use]
    pub fn is_animating(&self, id: ClientId) -> bool {
        self.clients.get(&id).is_some_and(|client| client.animation.running)
    }

    /// Anything on the monitor is still moving, closing snapshots included.
    #[must_use]
    pub fn is_monitor_animating(&self, monitor: MonitorId) -> bool {
        self.clients
            .values()
            .any(|client| client.monitor == monitor && client.animation.running)
            || self.fade_outs.iter().any(|fade| fade.monitor == monitor)
    }

    // ========================================================================
    // Monitors
    // ========================================================================

    /// Registers a monitor. The first monitor becomes the focused one.
    ///
    /// # Errors
    ///
    /// Returns [`GlideError::InvalidArguments`] if the frame or window area is empty.
    pub fn add_monitor(&mut self, monitor: Monitor) -> Result<(), GlideError> {
        if !monitor.frame.is_valid() || !monitor.window_area.is_valid() {
            return Err(GlideError::InvalidArguments(format!(
                "monitor {} has an empty frame {}",
                monitor.name, monitor.frame
            )));
        }

        tracing::debug!(monitor = %monitor.id, name = %monitor.name, frame = %monitor.frame, "adding monitor");
        self.focused_monitor.get_or_insert(monitor.id);
        self.monitors.insert(monitor.id, monitor);
        Ok(())
    }

    fn monitor_mut(&mut self, id: MonitorId) -> Result<&mut Monitor, GlideError> {
        self.monitors.get_mut(&id).ok_or_else(|| GlideError::UnknownMonitor(id.to_string()))
    }

    /// Updates the monitor's visible tags.
    ///
    /// # Errors
    ///
    /// Returns [`GlideError::UnknownMonitor`] for an unknown handle.
    pub fn set_monitor_tagset(&mut self, id: MonitorId, tagset: u32) -> Result<(), GlideError> {
        self.monitor_mut(id)?.tagset = tagset;
        Ok(())
    }

    /// Switches the monitor's layout kind.
    ///
    /// # Errors
    ///
    /// Returns [`GlideError::UnknownMonitor`] for an unknown handle.
    pub fn set_monitor_layout(&mut self, id: MonitorId, layout: LayoutKind) -> Result<(), GlideError> {
        self.monitor_mut(id)?.layout = layout;
        Ok(())
    }

    /// Updates the monitor's usable area (the frame minus bars and gaps).
    ///
    /// # Errors
    ///
    /// Returns [`GlideError::UnknownMonitor`] for an unknown handle and
    /// [`GlideError::InvalidArguments`] for an empty area.
    pub fn set_window_area(&mut self, id: MonitorId, area: Rect) -> Result<(), GlideError> {
        if !area.is_valid() {
            return Err(GlideError::InvalidArguments(format!("empty window area {area}")));
        }
        self.monitor_mut(id)?.window_area = area;
        Ok(())
    }

    /// Focuses a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`GlideError::UnknownMonitor`] for an unknown handle.
    pub fn focus_monitor(&mut self, id: MonitorId) -> Result<(), GlideError> {
        if !self.monitors.contains_key(&id) {
            return Err(GlideError::UnknownMonitor(id.to_string()));
        }
        self.focused_monitor = Some(id);
        Ok(())
    }

    /// Union of all monitor frames.
    fn layout_box(&self) -> Rect {
        self.monitors
            .values()
            .map(|monitor| monitor.frame)
            .reduce(|acc, frame| acc.union(&frame))
            .unwrap_or_else(Rect::zero)
    }

    // ========================================================================
    // Client Context
    // ========================================================================

    /// Snapshot of everything a step of `id` depends on besides the client.
    fn context(&self, id: ClientId) -> Option<ClientContext> {
        let client = self.clients.get(&id)?;
        let monitor = self.monitors.get(&client.monitor)?;

        let visible_tiling = self
            .clients
            .values()
            .filter(|other| {
                other.monitor == monitor.id && other.is_tiled() && other.is_visible_on(monitor.tagset)
            })
            .count();

        Some(ClientContext {
            config: Arc::clone(&self.config),
            monitor: monitor.geometry(),
            layout_box: self.layout_box(),
            grabbed: self.grabbed == Some(id),
            focused: self.focused_monitor == Some(monitor.id) && monitor.selection == Some(id),
            hovered: self.pointer == Some(id),
            visible_tiling,
            visible_on_monitor: client.is_visible_on(monitor.tagset),
            swallower_box: client
                .swallowed_by
                .and_then(|swallower| self.clients.get(&swallower))
                .map(|swallower| swallower.animation.current),
        })
    }

    /// Runs `apply` on a client with its context. `None` for unknown clients.
    fn with_client<R>(
        &mut self,
        id: ClientId,
        apply: impl FnOnce(&mut Client, &ClientContext, &mut S, &mut EffectQueue) -> R,
    ) -> Option<R> {
        let ctx = self.context(id)?;
        let client = self.clients.get_mut(&id)?;
        Some(apply(client, &ctx, &mut self.scene, &mut self.effects))
    }

    // ========================================================================
    // Mapping
    // ========================================================================

    /// Maps a new client and creates its scene nodes.
    ///
    /// The client gets no geometry until the first [`Self::resize`], which
    /// plays the open transition.
    ///
    /// # Errors
    ///
    /// Returns [`GlideError::UnknownMonitor`] if the requested monitor (or, when
    /// none is requested, any focused monitor) does not exist.
    pub fn map_client(&mut self, spec: ClientSpec) -> Result<ClientId, GlideError> {
        let monitor = spec
            .monitor
            .or(self.focused_monitor)
            .ok_or_else(|| GlideError::UnknownMonitor("no monitor registered".to_string()))?;
        if !self.monitors.contains_key(&monitor) {
            return Err(GlideError::UnknownMonitor(monitor.to_string()));
        }

        let layer = if spec.flags.overlay {
            Layer::Overlay
        } else if spec.flags.floating {
            Layer::Float
        } else {
            Layer::Tile
        };

        let root = self.scene.create_node(Parent::Layer(layer), NodeKind::Tree);
        let shadow = self.scene.create_node(Parent::Node(root), NodeKind::Shadow);
        let border = self.scene.create_node(Parent::Node(root), NodeKind::Rect);
        let surface = self.scene.create_node(Parent::Node(root), NodeKind::Tree);

        let shadows = &self.config.decorations.shadows;
        self.scene.set_shadow_style(shadow, shadows.blur, shadows.rgba());

        let bw = if spec.rules.no_border { 0 } else { border_px(&self.config.decorations) };
        let id = ClientId(self.next_client);
        self.next_client += 1;

        let nodes = ClientNodes { root, border, shadow, surface };
        self.clients.insert(id, Client::new(id, monitor, &spec, bw, nodes));
        self.with_client(id, |client, ctx, scene, _| refresh_border_color(client, ctx, scene));

        tracing::debug!(client = %id, monitor = %monitor, ?layer, "mapped client");
        Ok(id)
    }

    /// Starts the close transition of a client on a snapshot of its subtree.
    ///
    /// The live nodes are disabled. Returns `true` if a transition started.
    /// A client is handed over at most once; later calls do nothing.
    pub fn init_close(&mut self, id: ClientId) -> bool {
        let started = self
            .with_client(id, |client, ctx, scene, effects| {
                if client.is_closing {
                    return None;
                }
                client.is_closing = true;
                FadeOutClient::start(client, ctx, scene, effects)
            })
            .flatten();

        match started {
            Some(fade) => {
                self.fade_outs.push(fade);
                true
            }
            None => false,
        }
    }

    /// Unmaps a client: plays its close transition and destroys its nodes.
    pub fn unmap_client(&mut self, id: ClientId) -> bool {
        let animated = self.init_close(id);

        let Some(client) = self.clients.remove(&id) else {
            return false;
        };
        self.scene.destroy_node(client.nodes.root);

        if self.grabbed == Some(id) {
            self.grabbed = None;
        }
        if self.pointer == Some(id) {
            self.pointer = None;
        }
        for monitor in self.monitors.values_mut() {
            if monitor.selection == Some(id) {
                monitor.selection = None;
            }
        }
        for other in self.clients.values_mut() {
            if other.swallowed_by == Some(id) {
                other.swallowed_by = None;
            }
            if other.swallowing == Some(id) {
                other.swallowing = None;
            }
        }

        tracing::debug!(client = %id, animated, "unmapped client");
        true
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Moves a client to `target`, animating when configured.
    ///
    /// Calling this while a transition runs retargets it: the new transition
    /// starts from the box currently on screen.
    pub fn resize(&mut self, id: ClientId, target: Rect, interactive: bool) -> bool {
        self.with_client(id, |client, ctx, scene, effects| {
            resize(client, ctx, scene, effects, target, interactive);
            if ctx.grabbed {
                tracing::trace!(client = %client.id, geom = %client.geom, "grabbed client, skipping animation");
            }
        })
        .is_some()
    }

    /// Steps a client's running transition by one frame.
    pub fn advance_frame(&mut self, id: ClientId) -> bool {
        self.with_client(id, |client, ctx, scene, effects| {
            if client.animation.running {
                advance_frame(client, ctx, scene, effects);
            }
        })
        .is_some()
    }

    /// Slides a client out of a tag being hidden.
    ///
    /// The layout box is kept; only the animation target moves off-screen.
    /// Without animations the client is hidden and suspended at once.
    pub fn tag_out(&mut self, id: ClientId, direction: SwitchDirection) -> bool {
        self.with_client(id, |client, ctx, scene, effects| {
            let animations = &ctx.config.animations;
            if !animations.enabled {
                client.animation.tag = TagPhase::Left;
                scene.set_enabled(client.nodes.root, false);
                effects.push(CompositorEffect::SetSuspended {
                    client: client.id,
                    suspended: true,
                });
                return;
            }

            let (dx, dy) = leave_offset(direction, animations.tag_direction, ctx.monitor.frame);
            client.animation.tag = TagPhase::Leaving;
            client.pending = client.geom.translated(dx, dy);
            let geom = client.geom;
            resize(client, ctx, scene, effects, geom, false);
        })
        .is_some()
    }

    /// Slides a client in onto a tag being shown, ending at `target`.
    pub fn tag_in(&mut self, id: ClientId, target: Rect, direction: SwitchDirection) -> bool {
        self.with_client(id, |client, ctx, scene, effects| {
            let animations = &ctx.config.animations;
            client.animation.tag = if animations.enabled { TagPhase::Entering } else { TagPhase::None };
            scene.set_enabled(client.nodes.root, true);
            effects.push(CompositorEffect::SetSuspended {
                client: client.id,
                suspended: false,
            });

            let (dx, dy) = leave_offset(direction, animations.tag_direction, ctx.monitor.frame);
            client.animainit_geom.x = target.x - dx;
            client.animainit_geom.y = target.y - dy;
            resize(client, ctx, scene, effects, target, false);
        })
        .is_some()
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Draws one frame on a monitor.
    ///
    /// Steps every client and closing snapshot on it and requests another
    /// frame while anything is still moving. Returns whether it is.
    pub fn on_frame(&mut self, monitor: MonitorId) -> bool {
        if !self.monitors.contains_key(&monitor) {
            return false;
        }

        let ids: Vec<ClientId> = self
            .clients
            .values()
            .filter(|client| client.monitor == monitor)
            .map(|client| client.id)
            .collect();

        for id in ids {
            self.with_client(id, draw_frame);
        }

        let config = &self.config.animations;
        let scene = &mut self.scene;
        self.fade_outs.retain_mut(|fade| {
            if fade.monitor != monitor {
                return true;
            }
            let finished = fade.tick(config, scene);
            if finished {
                tracing::debug!(node = ?fade.node, "close animation finished");
            }
            !finished
        });

        let moving = self.is_monitor_animating(monitor);
        if moving {
            self.effects.request_frame(monitor);
        }
        moving
    }

    // ========================================================================
    // Client State
    // ========================================================================

    /// Sets the client being moved or resized interactively.
    pub fn set_grabbed(&mut self, id: Option<ClientId>) {
        self.grabbed = id.filter(|id| self.clients.contains_key(id));
    }

    /// Sets the client under the pointer.
    pub fn set_pointer_client(&mut self, id: Option<ClientId>) {
        self.pointer = id.filter(|id| self.clients.contains_key(id));
    }

    /// Focuses a client (or clears focus on the focused monitor).
    ///
    /// Borders are recolored and a frame is requested so idle opacity follows.
    pub fn set_focus(&mut self, id: Option<ClientId>) -> bool {
        let previous = self
            .focused_monitor
            .and_then(|monitor| self.monitors.get(&monitor))
            .and_then(|monitor| monitor.selection);

        let monitor = match id {
            Some(id) => match self.clients.get(&id) {
                Some(client) => client.monitor,
                None => return false,
            },
            None => match self.focused_monitor {
                Some(monitor) => monitor,
                None => return false,
            },
        };

        self.focused_monitor = Some(monitor);
        if let Some(state) = self.monitors.get_mut(&monitor) {
            state.selection = id;
        }

        for changed in [previous, id].into_iter().flatten() {
            self.with_client(changed, |client, ctx, scene, effects| {
                refresh_border_color(client, ctx, scene);
                effects.request_frame(ctx.monitor.id);
            });
        }
        true
    }

    /// Replaces a client's state flags and recolors its border.
    pub fn set_client_flags(&mut self, id: ClientId, flags: ClientFlags) -> bool {
        self.with_client(id, |client, ctx, scene, effects| {
            client.flags = flags;
            refresh_border_color(client, ctx, scene);
            effects.request_frame(ctx.monitor.id);
        })
        .is_some()
    }

    /// Records that `swallower` swallowed `swallowed` (a terminal hosting a GUI child).
    pub fn set_swallow(&mut self, swallower: ClientId, swallowed: ClientId) -> bool {
        if swallower == swallowed
            || !self.clients.contains_key(&swallower)
            || !self.clients.contains_key(&swallowed)
        {
            return false;
        }

        if let Some(client) = self.clients.get_mut(&swallower) {
            client.swallowing = Some(swallowed);
        }
        if let Some(client) = self.clients.get_mut(&swallowed) {
            client.swallowed_by = Some(swallower);
        }
        true
    }

    /// Records the surface geometry the client committed.
    pub fn set_surface_geometry(&mut self, id: ClientId, surface: Rect) -> bool {
        match self.clients.get_mut(&id) {
            Some(client) => {
                client.surface = surface;
                true
            }
            None => false,
        }
    }

    /// Swaps in a new configuration.
    ///
    /// Running transitions keep the curve and duration they started with.
    pub fn reconfigure(&mut self, config: Arc<GlideConfig>) {
        self.config = config;
        tracing::info!("configuration replaced");

        let shadows = &self.config.decorations.shadows;
        let (blur, color) = (shadows.blur, shadows.rgba());
        for client in self.clients.values() {
            self.scene.set_shadow_style(client.nodes.shadow, blur, color);
        }

        let ids: Vec<ClientId> = self.clients.keys().copied().collect();
        for id in ids {
            self.with_client(id, |client, ctx, scene, effects| {
                refresh_border_color(client, ctx, scene);
                client.need_output_flush = true;
                effects.request_frame(ctx.monitor.id);
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

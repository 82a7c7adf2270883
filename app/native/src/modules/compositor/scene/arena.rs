//! In-memory scene graph.
//!
//! Keeps every node in an arena keyed by [`NodeId`] and records each command
//! it receives, so tests and the demo driver can inspect exactly what the
//! engine asked the renderer to do.

use std::collections::{BTreeMap, HashMap};

use smallvec::SmallVec;

use super::{
    BufferList, ClippedRegion, Layer, NodeId, NodeKind, Parent, SceneBuffer, SceneGraph,
    SurfaceInfo,
};
use crate::config::Rgba;
use crate::error::GlideError;
use crate::modules::compositor::geometry::{CornerLocation, gezero};
use crate::modules::compositor::state::Rect;

// ============================================================================
// Types
// ============================================================================

/// Presentation state of a buffer node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferState {
    pub surface: Option<SurfaceInfo>,
    pub dest_size: Option<(i32, i32)>,
    pub opacity: f32,
    pub corner_radius: i32,
    pub corners: CornerLocation,
}

impl Default for BufferState {
    fn default() -> Self {
        Self {
            surface: None,
            dest_size: None,
            opacity: 1.0,
            corner_radius: 0,
            corners: CornerLocation::ALL,
        }
    }
}

/// A node and everything set on it.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent: Parent,
    pub children: Vec<NodeId>,
    pub enabled: bool,
    /// Position relative to the parent.
    pub position: (i32, i32),
    /// Extra offset of a snapshot root, the on-screen origin of what it copied.
    pub anchor: (i32, i32),
    pub size: (i32, i32),
    pub color: Option<Rgba>,
    pub corner_radius: i32,
    pub corners: CornerLocation,
    pub clipped_region: Option<ClippedRegion>,
    pub shadow_style: Option<(f64, Rgba)>,
    pub subsurface_clip: Option<Rect>,
    pub buffer: Option<BufferState>,
}

impl SceneNode {
    fn new(id: NodeId, kind: NodeKind, parent: Parent) -> Self {
        Self {
            id,
            kind,
            parent,
            children: Vec::new(),
            enabled: true,
            position: (0, 0),
            anchor: (0, 0),
            size: (0, 0),
            color: None,
            corner_radius: 0,
            corners: CornerLocation::ALL,
            clipped_region: None,
            shadow_style: None,
            subsurface_clip: None,
            buffer: (kind == NodeKind::Buffer).then(BufferState::default),
        }
    }
}

/// A command received through [`SceneGraph`].
#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    Create { node: NodeId, kind: NodeKind },
    Destroy { node: NodeId },
    SetEnabled { node: NodeId, enabled: bool },
    SetPosition { node: NodeId, x: i32, y: i32 },
    SetRectSize { node: NodeId, width: i32, height: i32 },
    SetRectColor { node: NodeId, color: Rgba },
    SetCornerRadius { node: NodeId, radius: i32, corners: CornerLocation },
    SetClippedRegion { node: NodeId, region: ClippedRegion },
    SetShadowStyle { node: NodeId, blur_sigma: f64, color: Rgba },
    SetSubsurfaceClip { node: NodeId, clip: Rect },
    SetBufferDestSize { buffer: NodeId, width: i32, height: i32 },
    SetBufferOpacity { buffer: NodeId, opacity: f32 },
    SetBufferCornerRadius { buffer: NodeId, radius: i32, corners: CornerLocation },
    Snapshot { source: NodeId, copy: Option<NodeId> },
}

// ============================================================================
// Arena
// ============================================================================

/// Scene graph held entirely in memory.
#[derive(Debug, Default)]
pub struct SceneArena {
    nodes: BTreeMap<NodeId, SceneNode>,
    layers: HashMap<Layer, Vec<NodeId>>,
    next_id: u64,
    commands: Vec<SceneCommand>,
    fail_snapshots: bool,
}

impl SceneArena {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns a node, if it exists.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> { self.nodes.get(&id) }

    /// Returns a node or a scene error naming the missing handle.
    ///
    /// # Errors
    ///
    /// Returns `GlideError::SceneError` if the node does not exist.
    pub fn try_node(&self, id: NodeId) -> Result<&SceneNode, GlideError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| GlideError::SceneError(format!("node {} does not exist", id.0)))
    }

    /// Whether the node exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool { self.nodes.contains_key(&id) }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Whether the scene has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Top-level nodes of a layer, bottom to top.
    #[must_use]
    pub fn layer(&self, layer: Layer) -> &[NodeId] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every command received so far.
    #[must_use]
    pub fn commands(&self) -> &[SceneCommand] { &self.commands }

    /// Forgets the recorded commands.
    pub fn clear_commands(&mut self) { self.commands.clear(); }

    /// Makes every following snapshot fail, like a renderer out of memory.
    pub const fn set_snapshot_failure(&mut self, fail: bool) { self.fail_snapshots = fail; }

    /// Adds a buffer presenting `surface` under `parent`.
    pub fn add_buffer(&mut self, parent: NodeId, surface: SurfaceInfo) -> NodeId {
        let id = self.create_node(Parent::Node(parent), NodeKind::Buffer);
        if let Some(buffer) = self.nodes.get_mut(&id).and_then(|node| node.buffer.as_mut()) {
            buffer.surface = Some(surface);
        }
        id
    }

    /// On-screen position of a node.
    #[must_use]
    pub fn absolute_position(&self, id: NodeId) -> Option<(i32, i32)> {
        let mut node = self.nodes.get(&id)?;
        let (mut x, mut y) = (0, 0);

        loop {
            x += node.position.0 + node.anchor.0;
            y += node.position.1 + node.anchor.1;
            match node.parent {
                Parent::Layer(_) => return Some((x, y)),
                Parent::Node(parent) => node = self.nodes.get(&parent)?,
            }
        }
    }

    /// Whether the node and all of its ancestors are enabled.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(&id) else {
                return false;
            };
            if !node.enabled {
                return false;
            }
            current = match node.parent {
                Parent::Layer(_) => None,
                Parent::Node(parent) => Some(parent),
            };
        }
        true
    }

    /// Buffer state of a buffer node.
    #[must_use]
    pub fn buffer(&self, id: NodeId) -> Option<&BufferState> {
        self.nodes.get(&id).and_then(|node| node.buffer.as_ref())
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn attach(&mut self, id: NodeId, parent: Parent) {
        match parent {
            Parent::Layer(layer) => self.layers.entry(layer).or_default().push(id),
            Parent::Node(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.push(id);
                }
            }
        }
    }

    fn detach(&mut self, id: NodeId, parent: Parent) {
        match parent {
            Parent::Layer(layer) => {
                if let Some(nodes) = self.layers.get_mut(&layer) {
                    nodes.retain(|&node| node != id);
                }
            }
            Parent::Node(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|&node| node != id);
                }
            }
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    fn copy_subtree(&mut self, source: NodeId, parent: Parent) -> Option<NodeId> {
        let original = self.nodes.get(&source)?.clone();
        let id = self.allocate();

        let mut copy = original.clone();
        copy.id = id;
        copy.parent = parent;
        copy.children = Vec::new();
        self.nodes.insert(id, copy);
        self.attach(id, parent);

        for child in original.children {
            self.copy_subtree(child, Parent::Node(id));
        }

        Some(id)
    }

    fn with_node(&mut self, id: NodeId, apply: impl FnOnce(&mut SceneNode)) {
        if let Some(node) = self.nodes.get_mut(&id) {
            apply(node);
        }
    }

    fn with_buffer(&mut self, id: NodeId, apply: impl FnOnce(&mut BufferState)) {
        if let Some(buffer) = self.nodes.get_mut(&id).and_then(|node| node.buffer.as_mut()) {
            apply(buffer);
        }
    }
}

impl SceneGraph for SceneArena {
    fn create_node(&mut self, parent: Parent, kind: NodeKind) -> NodeId {
        let id = self.allocate();
        self.nodes.insert(id, SceneNode::new(id, kind, parent));
        self.attach(id, parent);
        self.commands.push(SceneCommand::Create { node: id, kind });
        id
    }

    fn destroy_node(&mut self, node: NodeId) {
        self.commands.push(SceneCommand::Destroy { node });
        let Some(parent) = self.nodes.get(&node).map(|n| n.parent) else {
            return;
        };
        self.detach(node, parent);
        self.remove_subtree(node);
    }

    fn set_enabled(&mut self, node: NodeId, enabled: bool) {
        self.commands.push(SceneCommand::SetEnabled { node, enabled });
        self.with_node(node, |n| n.enabled = enabled);
    }

    fn set_position(&mut self, node: NodeId, x: i32, y: i32) {
        self.commands.push(SceneCommand::SetPosition { node, x, y });
        self.with_node(node, |n| n.position = (x, y));
    }

    fn set_rect_size(&mut self, node: NodeId, width: i32, height: i32) {
        self.commands.push(SceneCommand::SetRectSize { node, width, height });
        self.with_node(node, |n| n.size = (gezero(width), gezero(height)));
    }

    fn set_rect_color(&mut self, node: NodeId, color: Rgba) {
        self.commands.push(SceneCommand::SetRectColor { node, color });
        self.with_node(node, |n| n.color = Some(color));
    }

    fn set_corner_radius(&mut self, node: NodeId, radius: i32, corners: CornerLocation) {
        self.commands.push(SceneCommand::SetCornerRadius { node, radius, corners });
        self.with_node(node, |n| {
            n.corner_radius = radius;
            n.corners = corners;
        });
    }

    fn set_clipped_region(&mut self, node: NodeId, region: ClippedRegion) {
        self.commands.push(SceneCommand::SetClippedRegion { node, region });
        self.with_node(node, |n| n.clipped_region = Some(region));
    }

    fn set_shadow_style(&mut self, node: NodeId, blur_sigma: f64, color: Rgba) {
        self.commands.push(SceneCommand::SetShadowStyle { node, blur_sigma, color });
        self.with_node(node, |n| n.shadow_style = Some((blur_sigma, color)));
    }

    fn set_subsurface_clip(&mut self, node: NodeId, clip: Rect) {
        self.commands.push(SceneCommand::SetSubsurfaceClip { node, clip });
        self.with_node(node, |n| n.subsurface_clip = Some(clip));
    }

    fn buffers(&self, node: NodeId) -> BufferList {
        let mut found = SmallVec::new();
        let mut stack = vec![node];

        while let Some(id) = stack.pop() {
            let Some(current) = self.nodes.get(&id) else {
                continue;
            };
            if let Some(buffer) = &current.buffer {
                found.push(SceneBuffer { id, surface: buffer.surface });
            }
            stack.extend(current.children.iter().rev().copied());
        }

        found
    }

    fn set_buffer_dest_size(&mut self, buffer: NodeId, width: i32, height: i32) {
        self.commands.push(SceneCommand::SetBufferDestSize { buffer, width, height });
        self.with_buffer(buffer, |b| b.dest_size = Some((width, height)));
    }

    fn set_buffer_opacity(&mut self, buffer: NodeId, opacity: f32) {
        self.commands.push(SceneCommand::SetBufferOpacity { buffer, opacity });
        self.with_buffer(buffer, |b| b.opacity = opacity);
    }

    fn set_buffer_corner_radius(&mut self, buffer: NodeId, radius: i32, corners: CornerLocation) {
        self.commands.push(SceneCommand::SetBufferCornerRadius { buffer, radius, corners });
        self.with_buffer(buffer, |b| {
            b.corner_radius = radius;
            b.corners = corners;
        });
    }

    fn snapshot(&mut self, node: NodeId, layer: Layer) -> Option<NodeId> {
        let copy = if self.fail_snapshots {
            None
        } else {
            self.absolute_position(node).and_then(|anchor| {
                let copy = self.copy_subtree(node, Parent::Layer(layer))?;
                self.with_node(copy, |n| {
                    n.anchor = anchor;
                    n.position = (0, 0);
                });
                Some(copy)
            })
        };

        self.commands.push(SceneCommand::Snapshot { source: node, copy });
        copy
    }
}

// ============================================================================
// Tests
// ============================================================================

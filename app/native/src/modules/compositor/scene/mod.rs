//! Scene graph boundary.
//!
//! The engine drives rendering exclusively through [`SceneGraph`]. Nodes are
//! referenced by stable [`NodeId`] handles; the implementation owns them and
//! decides when their memory goes away.

mod arena;

pub use arena::{BufferState, SceneArena, SceneCommand, SceneNode};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::geometry::CornerLocation;
use super::state::Rect;
use crate::config::Rgba;

/// Stable handle of a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Stacking layers a client tree can live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Tile,
    Float,
    Top,
    /// Snapshots of closing windows.
    FadeOut,
    Overlay,
}

/// Where a new node is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parent {
    Layer(Layer),
    Node(NodeId),
}

/// What a node draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Groups children, draws nothing.
    Tree,
    /// Solid colored rectangle (borders).
    Rect,
    /// Blurred drop shadow.
    Shadow,
    /// Client content.
    Buffer,
}

/// Role of the surface behind a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceRole {
    Toplevel,
    Subsurface,
    Popup,
}

/// The surface a buffer presents, with its committed size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceInfo {
    pub role: SurfaceRole,
    pub width: i32,
    pub height: i32,
}

impl SurfaceInfo {
    #[must_use]
    pub const fn new(role: SurfaceRole, width: i32, height: i32) -> Self { Self { role, width, height } }
}

/// A buffer reached while walking a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneBuffer {
    pub id: NodeId,
    /// `None` for buffers that do not present a client surface.
    pub surface: Option<SurfaceInfo>,
}

/// Buffers of a subtree. Most windows have a handful.
pub type BufferList = SmallVec<[SceneBuffer; 4]>;

/// A rounded rectangle cut out of a rect or shadow node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClippedRegion {
    pub area: Rect,
    pub corner_radius: i32,
    pub corners: CornerLocation,
}

/// Commands the engine issues to the renderer.
///
/// Calls referencing a node that no longer exists must be ignored.
pub trait SceneGraph {
    /// Creates a node. Buffers start without a surface.
    fn create_node(&mut self, parent: Parent, kind: NodeKind) -> NodeId;

    /// Destroys a node and its whole subtree.
    fn destroy_node(&mut self, node: NodeId);

    fn set_enabled(&mut self, node: NodeId, enabled: bool);

    /// Position relative to the parent.
    fn set_position(&mut self, node: NodeId, x: i32, y: i32);

    /// Size of a rect or shadow node. Negative sizes are treated as 0.
    fn set_rect_size(&mut self, node: NodeId, width: i32, height: i32);

    fn set_rect_color(&mut self, node: NodeId, color: Rgba);

    fn set_corner_radius(&mut self, node: NodeId, radius: i32, corners: CornerLocation);

    fn set_clipped_region(&mut self, node: NodeId, region: ClippedRegion);

    fn set_shadow_style(&mut self, node: NodeId, blur_sigma: f64, color: Rgba);

    /// Clips every surface of a subtree to `clip`, in surface coordinates.
    fn set_subsurface_clip(&mut self, node: NodeId, clip: Rect);

    /// Buffers of a subtree, depth first.
    fn buffers(&self, node: NodeId) -> BufferList;

    fn set_buffer_dest_size(&mut self, buffer: NodeId, width: i32, height: i32);

    fn set_buffer_opacity(&mut self, buffer: NodeId, opacity: f32);

    fn set_buffer_corner_radius(&mut self, buffer: NodeId, radius: i32, corners: CornerLocation);

    /// Copies the rendered subtree of `node` into `layer`.
    ///
    /// The copy is anchored where `node` is on screen, so its own position
    /// starts at `(0, 0)`. Returns `None` when nothing could be captured.
    fn snapshot(&mut self, node: NodeId, layer: Layer) -> Option<NodeId>;
}

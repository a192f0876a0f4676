//! # Scene Access Layer
//!
//! The manipulation core never owns scene nodes. It reads and mutates them
//! through [`SceneAccess`], holding only [`NodeId`]s that the host may
//! invalidate at any time; every accessor therefore returns a
//! [`SceneResult`] and a stale id surfaces as
//! [`SceneError::UnknownNode`](crate::error::SceneError::UnknownNode).
//!
//! ## Key Components
//!
//! - [`SceneAccess`] - The trait hosts implement over their own scene graph
//! - [`Scene`] - An in-memory arena implementation
//! - [`NodeTransform`] - Decomposed local transform
//! - [`NodeDesc`] - Builder-style description of a node to create
//!
//! Nodes either belong to the main scene or to the overlay ("front") layer,
//! which is drawn after the main scene with a camera at the origin that
//! shares the main camera's projection. The gizmo lives in the overlay.

pub mod scene;
pub mod transform;

use cgmath::{Matrix4, SquareMatrix};

use crate::error::SceneResult;
use crate::gfx::camera::ViewportCamera;
use crate::gfx::geometry::GeometryData;
use crate::gfx::gizmos::HandleId;
use crate::gfx::material::Material;
use crate::gfx::picking::AABB;

pub use scene::Scene;
pub use transform::NodeTransform;

/// Opaque reference to a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Description of a node to create.
#[derive(Debug, Clone, Default)]
pub struct NodeDesc {
    pub name: String,
    pub transform: NodeTransform,
    pub geometry: Option<GeometryData>,
    pub material: Option<Material>,
    /// Gizmo handle this node belongs to, stored as opaque user data.
    pub handle: Option<HandleId>,
}

impl NodeDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn geometry(mut self, geometry: GeometryData) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn handle(mut self, handle: HandleId) -> Self {
        self.handle = Some(handle);
        self
    }
}

/// Read/write access to the host's scene graph and camera.
pub trait SceneAccess {
    fn camera(&self) -> Option<&ViewportCamera>;

    fn camera_mut(&mut self) -> Option<&mut ViewportCamera>;

    fn local_transform(&self, node: NodeId) -> SceneResult<NodeTransform>;

    fn set_local_transform(&mut self, node: NodeId, transform: NodeTransform) -> SceneResult<()>;

    fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>>;

    fn children(&self, node: NodeId) -> SceneResult<Vec<NodeId>>;

    /// The node's own mesh, if it has one.
    fn geometry(&self, node: NodeId) -> SceneResult<Option<&GeometryData>>;

    /// Bounds of the node's own geometry in its own frame.
    fn geometry_bounds(&self, node: NodeId) -> SceneResult<Option<AABB>> {
        Ok(self.geometry(node)?.and_then(GeometryData::bounds))
    }

    /// Creates a node under `parent`, or as a detached root when `parent` is `None`.
    fn create_node(&mut self, parent: Option<NodeId>, desc: NodeDesc) -> SceneResult<NodeId>;

    /// Removes the node and its whole subtree.
    fn remove_node(&mut self, node: NodeId) -> SceneResult<()>;

    /// Sets the node's traversal mask: hidden nodes are neither drawn nor picked.
    fn set_visible(&mut self, node: NodeId, visible: bool) -> SceneResult<()>;

    fn is_visible(&self, node: NodeId) -> SceneResult<bool>;

    fn set_material(&mut self, node: NodeId, material: Material) -> SceneResult<()>;

    fn set_geometry(&mut self, node: NodeId, geometry: GeometryData) -> SceneResult<()>;

    /// The gizmo handle id stored on the node, if any.
    fn handle_tag(&self, node: NodeId) -> SceneResult<Option<HandleId>>;

    /// Adds a root node to the overlay layer.
    fn attach_overlay(&mut self, node: NodeId) -> SceneResult<()>;

    fn detach_overlay(&mut self, node: NodeId) -> SceneResult<()>;

    fn is_in_overlay(&self, node: NodeId) -> SceneResult<bool>;

    /// Composed matrix from the node's frame to its layer's world frame.
    fn world_matrix(&self, node: NodeId) -> SceneResult<Matrix4<f32>> {
        let mut matrix = self.local_transform(node)?.matrix();
        let mut current = self.parent(node)?;
        while let Some(parent) = current {
            matrix = self.local_transform(parent)?.matrix() * matrix;
            current = self.parent(parent)?;
        }
        Ok(matrix)
    }

    /// Bounds of the node's geometry and all descendants, in the node's own frame.
    fn subtree_bounds(&self, node: NodeId) -> SceneResult<Option<AABB>> {
        let mut bounds = self.geometry_bounds(node)?;
        for child in self.children(node)? {
            if let Some(child_bounds) = self.bounding_box(child)? {
                bounds = Some(match bounds {
                    Some(b) => b.union(&child_bounds),
                    None => child_bounds,
                });
            }
        }
        Ok(bounds)
    }

    /// Bounds of the node's subtree in its parent's frame.
    fn bounding_box(&self, node: NodeId) -> SceneResult<Option<AABB>> {
        let local = self.local_transform(node)?.matrix();
        Ok(self.subtree_bounds(node)?.map(|b| b.transform(&local)))
    }

    /// Bounds of the node's subtree in world space.
    fn world_bounds(&self, node: NodeId) -> SceneResult<Option<AABB>> {
        let parent_world = match self.parent(node)? {
            Some(parent) => self.world_matrix(parent)?,
            None => Matrix4::identity(),
        };
        Ok(self.bounding_box(node)?.map(|b| b.transform(&parent_world)))
    }

    /// Whether the node and every ancestor are visible.
    fn is_effectively_visible(&self, node: NodeId) -> SceneResult<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if !self.is_visible(id)? {
                return Ok(false);
            }
            current = self.parent(id)?;
        }
        Ok(true)
    }
}

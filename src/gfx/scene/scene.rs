use log::debug;

use crate::error::{SceneError, SceneResult};
use crate::gfx::camera::ViewportCamera;
use crate::gfx::geometry::GeometryData;
use crate::gfx::gizmos::HandleId;
use crate::gfx::material::Material;
use crate::gfx::picking::AABB;

use super::{NodeDesc, NodeId, NodeTransform, SceneAccess};

/// A node stored in the scene arena
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: NodeTransform,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub geometry: Option<GeometryData>,
    pub material: Option<Material>,
    pub handle: Option<HandleId>,
    pub visible: bool,
    bounds: Option<AABB>,
}

/// In-memory scene with an optional camera and an overlay layer
///
/// Nodes live in an arena indexed by [`NodeId`]. Removed slots are left
/// empty rather than reused, so a stale id reports
/// [`SceneError::UnknownNode`] instead of aliasing a newer node.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    overlay: Vec<NodeId>,
    camera: Option<ViewportCamera>,
}

impl Scene {
    /// Creates an empty scene without a camera
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: ViewportCamera) -> Self {
        Self {
            camera: Some(camera),
            ..Self::default()
        }
    }

    pub fn set_camera(&mut self, camera: Option<ViewportCamera>) {
        self.camera = camera;
    }

    pub fn node(&self, id: NodeId) -> SceneResult<&SceneNode> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SceneError::UnknownNode(id))
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// First live node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, node)| match node {
            Some(node) if node.name == name => Some(NodeId(i)),
            _ => None,
        })
    }

    /// Root nodes currently attached to the overlay layer
    pub fn overlay_roots(&self) -> &[NodeId] {
        &self.overlay
    }
}

impl SceneAccess for Scene {
    fn camera(&self) -> Option<&ViewportCamera> {
        self.camera.as_ref()
    }

    fn camera_mut(&mut self) -> Option<&mut ViewportCamera> {
        self.camera.as_mut()
    }

    fn local_transform(&self, node: NodeId) -> SceneResult<NodeTransform> {
        Ok(self.node(node)?.transform)
    }

    fn set_local_transform(&mut self, node: NodeId, transform: NodeTransform) -> SceneResult<()> {
        self.node_mut(node)?.transform = transform;
        Ok(())
    }

    fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    fn children(&self, node: NodeId) -> SceneResult<Vec<NodeId>> {
        Ok(self.node(node)?.children.clone())
    }

    fn geometry(&self, node: NodeId) -> SceneResult<Option<&GeometryData>> {
        Ok(self.node(node)?.geometry.as_ref())
    }

    fn geometry_bounds(&self, node: NodeId) -> SceneResult<Option<AABB>> {
        Ok(self.node(node)?.bounds)
    }

    fn create_node(&mut self, parent: Option<NodeId>, desc: NodeDesc) -> SceneResult<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let id = NodeId(self.nodes.len());
        let bounds = desc.geometry.as_ref().and_then(GeometryData::bounds);
        self.nodes.push(Some(SceneNode {
            name: desc.name,
            transform: desc.transform,
            parent,
            children: Vec::new(),
            geometry: desc.geometry,
            material: desc.material,
            handle: desc.handle,
            visible: true,
            bounds,
        }));

        if let Some(parent) = parent {
            self.node_mut(parent)?.children.push(id);
        }
        Ok(id)
    }

    fn remove_node(&mut self, node: NodeId) -> SceneResult<()> {
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent {
            if let Ok(parent) = self.node_mut(parent) {
                parent.children.retain(|&child| child != node);
            }
        }
        self.overlay.retain(|&root| root != node);

        let mut pending = vec![node];
        let mut removed = 0;
        while let Some(id) = pending.pop() {
            if let Some(slot) = self.nodes.get_mut(id.0) {
                if let Some(entry) = slot.take() {
                    pending.extend(entry.children);
                    removed += 1;
                }
            }
        }
        debug!("removed {removed} scene node(s) under {node:?}");
        Ok(())
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> SceneResult<()> {
        self.node_mut(node)?.visible = visible;
        Ok(())
    }

    fn is_visible(&self, node: NodeId) -> SceneResult<bool> {
        Ok(self.node(node)?.visible)
    }

    fn set_material(&mut self, node: NodeId, material: Material) -> SceneResult<()> {
        self.node_mut(node)?.material = Some(material);
        Ok(())
    }

    fn set_geometry(&mut self, node: NodeId, geometry: GeometryData) -> SceneResult<()> {
        let entry = self.node_mut(node)?;
        entry.bounds = geometry.bounds();
        entry.geometry = Some(geometry);
        Ok(())
    }

    fn handle_tag(&self, node: NodeId) -> SceneResult<Option<HandleId>> {
        Ok(self.node(node)?.handle)
    }

    fn attach_overlay(&mut self, node: NodeId) -> SceneResult<()> {
        self.node(node)?;
        if !self.overlay.contains(&node) {
            self.overlay.push(node);
        }
        Ok(())
    }

    fn detach_overlay(&mut self, node: NodeId) -> SceneResult<()> {
        self.node(node)?;
        let before = self.overlay.len();
        self.overlay.retain(|&root| root != node);
        if self.overlay.len() == before {
            return Err(SceneError::NotAttached(node));
        }
        Ok(())
    }

    fn is_in_overlay(&self, node: NodeId) -> SceneResult<bool> {
        self.node(node)?;
        Ok(self.overlay.contains(&node))
    }
}

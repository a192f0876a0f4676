//! Gizmo handles and the arena that owns their scene nodes.
//!
//! Handles are addressed by [`HandleId`] (0..7). Each handle's scene nodes
//! carry that id as their handle tag, so a picked node resolves back to its
//! handle through [`HandleSet::handle_for_node`] without any pointer from the
//! scene into the gizmo.

use std::collections::HashMap;
use std::f32::consts::PI;

use cgmath::{Deg, One, Quaternion, Rotation3, Vector3};
use log::debug;

use crate::config::DraggerSettings;
use crate::error::SceneResult;
use crate::gfx::geometry::{generate_arrow, generate_sphere, generate_torus, GeometryData};
use crate::gfx::material::Material;
use crate::gfx::scene::{NodeDesc, NodeId, NodeTransform, SceneAccess};

pub const HANDLE_COUNT: usize = 7;

const ARROW_SEGMENTS: u32 = 32;
const RING_SEGMENTS: u32 = 48;
const TUBE_SEGMENTS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }

    /// Orientation turning the local +Z of generated geometry onto this axis.
    pub fn geometry_orientation(self) -> Quaternion<f32> {
        match self {
            Axis::X => Quaternion::from_angle_y(Deg(90.0)),
            Axis::Y => Quaternion::from_angle_x(Deg(-90.0)),
            Axis::Z => Quaternion::one(),
        }
    }
}

/// What dragging a handle does to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Translate(Axis),
    Rotate(Axis),
    UniformScale,
}

impl HandleKind {
    pub fn axis(self) -> Option<Axis> {
        match self {
            HandleKind::Translate(axis) | HandleKind::Rotate(axis) => Some(axis),
            HandleKind::UniformScale => None,
        }
    }
}

/// Index of a handle in the gizmo: 0..3 translate, 3..6 rotate, 6 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(usize);

impl HandleId {
    pub const SCALE: HandleId = HandleId(6);

    pub fn new(index: usize) -> Option<Self> {
        (index < HANDLE_COUNT).then_some(Self(index))
    }

    pub fn translate(axis: Axis) -> Self {
        Self(axis.index())
    }

    pub fn rotate(axis: Axis) -> Self {
        Self(3 + axis.index())
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn kind(self) -> HandleKind {
        match self.0 {
            0..=2 => HandleKind::Translate(Axis::ALL[self.0]),
            3..=5 => HandleKind::Rotate(Axis::ALL[self.0 - 3]),
            _ => HandleKind::UniformScale,
        }
    }

    pub fn all() -> impl Iterator<Item = HandleId> {
        (0..HANDLE_COUNT).map(HandleId)
    }
}

/// Which handle groups are usable. Parsed from the `DraggerFilters` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraggerFilters {
    pub translate: bool,
    pub rotate: bool,
    pub scale: bool,
}

impl DraggerFilters {
    pub const TRANSLATE_BIT: u32 = 0x1;
    pub const ROTATE_BIT: u32 = 0x2;
    pub const SCALE_BIT: u32 = 0x4;

    pub const fn all() -> Self {
        Self {
            translate: true,
            rotate: true,
            scale: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            translate: false,
            rotate: false,
            scale: false,
        }
    }

    pub fn from_bits(bits: u32) -> Self {
        Self {
            translate: bits & Self::TRANSLATE_BIT != 0,
            rotate: bits & Self::ROTATE_BIT != 0,
            scale: bits & Self::SCALE_BIT != 0,
        }
    }

    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.translate {
            bits |= Self::TRANSLATE_BIT;
        }
        if self.rotate {
            bits |= Self::ROTATE_BIT;
        }
        if self.scale {
            bits |= Self::SCALE_BIT;
        }
        bits
    }

    pub fn allows(self, kind: HandleKind) -> bool {
        match kind {
            HandleKind::Translate(_) => self.translate,
            HandleKind::Rotate(_) => self.rotate,
            HandleKind::UniformScale => self.scale,
        }
    }
}

impl Default for DraggerFilters {
    fn default() -> Self {
        Self::all()
    }
}

/// One pickable part of the gizmo.
#[derive(Debug, Clone)]
pub struct GizmoHandle {
    pub id: HandleId,
    pub kind: HandleKind,
    /// Handle root under the gizmo root; its visibility masks the whole handle.
    pub node: NodeId,
    /// Geometry shown normally.
    pub part: NodeId,
    /// Full-circle ring shown instead of `part` for planar targets.
    pub full_part: Option<NodeId>,
    highlighted: bool,
    full: bool,
    normal: Material,
    highlight: Material,
}

impl GizmoHandle {
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Swaps between the normal and the highlight material.
    pub fn set_highlight<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, highlighted: bool) -> SceneResult<()> {
        let material = if highlighted { self.highlight } else { self.normal };
        scene.set_material(self.part, material)?;
        if let Some(full_part) = self.full_part {
            scene.set_material(full_part, material)?;
        }
        self.highlighted = highlighted;
        Ok(())
    }

    /// Shows the full ring instead of the half ring. No-op for handles without one.
    pub fn set_full<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, full: bool) -> SceneResult<()> {
        let Some(full_part) = self.full_part else {
            return Ok(());
        };
        scene.set_visible(self.part, !full)?;
        scene.set_visible(full_part, full)?;
        self.full = full;
        Ok(())
    }

    pub fn set_enabled<S: SceneAccess + ?Sized>(&self, scene: &mut S, enabled: bool) -> SceneResult<()> {
        scene.set_visible(self.node, enabled)
    }

    pub fn is_enabled<S: SceneAccess + ?Sized>(&self, scene: &S) -> SceneResult<bool> {
        scene.is_visible(self.node)
    }
}

/// The gizmo root and its seven handles.
#[derive(Debug, Clone)]
pub struct HandleSet {
    root: NodeId,
    handles: Vec<GizmoHandle>,
    lookup: HashMap<NodeId, HandleId>,
}

impl HandleSet {
    /// Creates the gizmo root (detached from any layer) and all handle nodes.
    pub fn build<S: SceneAccess + ?Sized>(scene: &mut S, settings: &DraggerSettings) -> SceneResult<Self> {
        let root = scene.create_node(None, NodeDesc::new("TransformGizmo"))?;
        let mut set = Self {
            root,
            handles: Vec::with_capacity(HANDLE_COUNT),
            lookup: HashMap::new(),
        };

        for id in HandleId::all() {
            let handle = set.build_handle(scene, settings, id)?;
            set.handles.push(handle);
        }

        debug!("built gizmo handles under {root:?}");
        Ok(set)
    }

    fn build_handle<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        settings: &DraggerSettings,
        id: HandleId,
    ) -> SceneResult<GizmoHandle> {
        let dims = &settings.dimensions;
        let kind = id.kind();

        let (color, orientation) = match kind.axis() {
            Some(axis) => (settings.axis_colors[axis.index()], axis.geometry_orientation()),
            None => (settings.scale_color, Quaternion::one()),
        };
        let (normal, highlight) = match kind {
            HandleKind::Translate(_) => (Material::handle(color), Material::handle_highlight(color)),
            _ => (
                Material::translucent_handle(color),
                Material::handle_highlight(color),
            ),
        };

        let (part_geometry, full_geometry): (GeometryData, Option<GeometryData>) = match kind {
            HandleKind::Translate(_) => (
                generate_arrow(
                    dims.shaft_radius,
                    dims.shaft_length,
                    dims.tip_radius,
                    dims.tip_length,
                    ARROW_SEGMENTS,
                ),
                None,
            ),
            HandleKind::Rotate(_) => (
                generate_torus(dims.ring_radius, dims.ring_tube, PI, RING_SEGMENTS, TUBE_SEGMENTS),
                Some(generate_torus(
                    dims.full_ring_radius,
                    dims.ring_tube,
                    2.0 * PI,
                    RING_SEGMENTS,
                    TUBE_SEGMENTS,
                )),
            ),
            HandleKind::UniformScale => (
                generate_sphere(dims.scale_ball_radius, RING_SEGMENTS, TUBE_SEGMENTS * 2),
                None,
            ),
        };

        let name = format!("{kind:?}");
        let node = scene.create_node(
            Some(self.root),
            NodeDesc::new(name.clone())
                .transform(NodeTransform::from_orientation(orientation))
                .handle(id),
        )?;
        let part = scene.create_node(
            Some(node),
            NodeDesc::new(format!("{name}.part"))
                .geometry(part_geometry)
                .material(normal)
                .handle(id),
        )?;
        self.lookup.insert(node, id);
        self.lookup.insert(part, id);

        let full_part = match full_geometry {
            Some(geometry) => {
                let full = scene.create_node(
                    Some(node),
                    NodeDesc::new(format!("{name}.full"))
                        .geometry(geometry)
                        .material(normal)
                        .handle(id),
                )?;
                scene.set_visible(full, false)?;
                self.lookup.insert(full, id);
                Some(full)
            }
            None => None,
        };

        Ok(GizmoHandle {
            id,
            kind,
            node,
            part,
            full_part,
            highlighted: false,
            full: false,
            normal,
            highlight,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: HandleId) -> &GizmoHandle {
        &self.handles[id.index()]
    }

    pub fn get_mut(&mut self, id: HandleId) -> &mut GizmoHandle {
        &mut self.handles[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &GizmoHandle> {
        self.handles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GizmoHandle> {
        self.handles.iter_mut()
    }

    /// Resolves a scene node (or any of its ancestors) to the handle it belongs to.
    pub fn handle_for_node<S: SceneAccess + ?Sized>(&self, scene: &S, node: NodeId) -> SceneResult<Option<HandleId>> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(&handle) = self.lookup.get(&id) {
                return Ok(Some(handle));
            }
            if let Some(handle) = scene.handle_tag(id)? {
                return Ok(Some(handle));
            }
            current = scene.parent(id)?;
        }
        Ok(None)
    }

    /// Removes the root and every handle node from the scene.
    pub fn destroy<S: SceneAccess + ?Sized>(self, scene: &mut S) -> SceneResult<()> {
        if scene.is_in_overlay(self.root)? {
            scene.detach_overlay(self.root)?;
        }
        scene.remove_node(self.root)
    }
}

//! The transform gizmo: seven handles bound to the selected element.
//!
//! The gizmo lives in the overlay layer. Its root is re-placed whenever the
//! camera or the element moves so that it sits on the element's pivot, turns
//! with the element and keeps a constant apparent size. Dragging an armed
//! handle turns cursor travel into an incremental change of the element's
//! local transform (see [`drag_math`](super::drag_math)).
//!
//! Scene errors never escape the event handlers: a stale node drops the drag
//! session, logs a warning and reports the event as not handled.

use cgmath::{InnerSpace, Matrix4, Quaternion, SquareMatrix, Vector3};
use log::{debug, trace, warn};

use crate::config::DraggerSettings;
use crate::error::{SceneError, SceneResult};
use crate::gfx::picking::{pick_nodes, screen_to_view_ray};
use crate::gfx::scene::{NodeId, NodeTransform, SceneAccess};
use crate::input::{
    DocId, ElementId, EventResult, ModifierFlags, MouseAction, MouseEvent, Notification, ViewId,
    ViewMessage, ViewParam,
};

use super::drag_math::{
    axis_in_camera, gizmo_scale_factor, rotate_about_local_axis, rotation_angle, scale_step,
    translate_along_local_axis, translate_delta,
};
use super::handle::{Axis, DraggerFilters, HandleId, HandleKind, HandleSet};

/// How the bound element wants to be manipulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    #[default]
    Regular,
    /// Planar section: translation and the Z ring are masked, the X and Y rings show full circles.
    SectionPlane,
}

/// The element the gizmo is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionBinding {
    pub element_id: ElementId,
    pub doc_id: DocId,
    pub owner_module: String,
    /// Transform node the gizmo edits.
    pub node: NodeId,
    /// Descendant of `node` the user actually clicked, for partial selections.
    pub sub_node: Option<NodeId>,
    pub kind: ElementKind,
}

impl SelectionBinding {
    pub fn new(element_id: ElementId, doc_id: DocId, owner_module: impl Into<String>, node: NodeId) -> Self {
        Self {
            element_id,
            doc_id,
            owner_module: owner_module.into(),
            node,
            sub_node: None,
            kind: ElementKind::Regular,
        }
    }

    pub fn with_sub_node(mut self, sub_node: NodeId) -> Self {
        self.sub_node = Some(sub_node);
        self
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_sub_element(&self) -> bool {
        self.sub_node.is_some()
    }
}

/// An armed handle. Exists from pick until disarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: HandleId,
    /// Set until the first move after arming has captured the baseline.
    pub first_move: bool,
    pub last_cursor: (i32, i32),
    pub target: NodeId,
}

impl DragSession {
    fn new(handle: HandleId, target: NodeId) -> Self {
        Self {
            handle,
            first_move: true,
            last_cursor: (0, 0),
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoState {
    /// Not in the overlay.
    Idle,
    Attached,
    /// A handle is armed.
    Armed,
}

/// Per-viewport transform gizmo.
pub struct TransformGizmo {
    view: ViewId,
    settings: DraggerSettings,
    filters: DraggerFilters,
    handles: Option<HandleSet>,
    binding: Option<SelectionBinding>,
    visible: bool,
    gizmo_scale: f32,
    pre_picked: Option<HandleId>,
    last_picked: Option<HandleId>,
    session: Option<DragSession>,
    notifications: Vec<Notification>,
}

impl TransformGizmo {
    pub fn new(view: ViewId, settings: DraggerSettings) -> Self {
        Self {
            view,
            filters: settings.filters,
            settings,
            handles: None,
            binding: None,
            visible: false,
            gizmo_scale: 1.0,
            pre_picked: None,
            last_picked: None,
            session: None,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> GizmoState {
        match (self.visible, self.session) {
            (false, _) => GizmoState::Idle,
            (true, None) => GizmoState::Attached,
            (true, Some(_)) => GizmoState::Armed,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.handles.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True once the armed handle has a baseline and moves are changing the element.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some_and(|s| !s.first_move)
    }

    pub fn binding(&self) -> Option<&SelectionBinding> {
        self.binding.as_ref()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn handles(&self) -> Option<&HandleSet> {
        self.handles.as_ref()
    }

    pub fn filters(&self) -> DraggerFilters {
        self.filters
    }

    pub fn pre_picked(&self) -> Option<HandleId> {
        self.pre_picked
    }

    /// Uniform scale of the gizmo root from the last placement.
    pub fn gizmo_scale(&self) -> f32 {
        self.gizmo_scale
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Builds the handle nodes. The gizmo stays detached until an element is bound.
    pub fn register<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        if self.handles.is_some() {
            return Err(SceneError::AlreadyRegistered);
        }
        let handles = HandleSet::build(scene, &self.settings)?;
        self.handles = Some(handles);
        self.visible = false;
        self.session = None;
        self.pre_picked = None;
        self.last_picked = None;
        self.apply_visibilities(scene)?;
        debug!("view {:?}: gizmo registered", self.view);
        Ok(())
    }

    /// Removes the handle nodes and forgets the binding.
    pub fn unload<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        self.binding = None;
        self.session = None;
        self.pre_picked = None;
        self.last_picked = None;
        self.visible = false;
        if let Some(handles) = self.handles.take() {
            handles.destroy(scene)?;
            debug!("view {:?}: gizmo unloaded", self.view);
        }
        Ok(())
    }

    /// Binds the gizmo to a newly highlighted element and attaches it.
    ///
    /// A different element than the current one first detaches the gizmo.
    /// Ignored until the gizmo is registered.
    pub fn on_selection_changed<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        binding: SelectionBinding,
    ) -> EventResult {
        if self.handles.is_none() {
            return EventResult::IGNORED;
        }
        let was_visible = self.visible;
        let result = self.rebind(scene, binding);
        match result {
            Ok(()) => EventResult::HANDLED.with_repaint(was_visible || self.visible),
            Err(err) => {
                warn!("view {:?}: cannot bind gizmo: {err}", self.view);
                self.drop_binding(scene);
                EventResult::IGNORED.with_repaint(was_visible)
            }
        }
    }

    fn rebind<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, binding: SelectionBinding) -> SceneResult<()> {
        if self.binding.as_ref().map(|b| b.node) != Some(binding.node) {
            self.binding = None;
            self.detach(scene)?;
        }

        scene.local_transform(binding.node)?;
        debug!(
            "view {:?}: gizmo bound to element {:?} of {}",
            self.view, binding.element_id, binding.owner_module
        );
        self.binding = Some(binding);
        self.apply_visibilities(scene)?;
        self.attach(scene)
    }

    /// Drops the binding if it refers to `node`.
    pub fn on_selection_lost<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, node: NodeId) -> EventResult {
        if self.binding.as_ref().map(|b| b.node) != Some(node) {
            return EventResult::IGNORED;
        }
        let was_visible = self.visible;
        self.drop_binding(scene);
        EventResult::HANDLED.with_repaint(was_visible)
    }

    fn drop_binding<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) {
        self.binding = None;
        if let Err(err) = self.detach(scene) {
            warn!("view {:?}: gizmo detach failed: {err}", self.view);
            self.visible = false;
            self.session = None;
        }
    }

    fn attach<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        let Some(root) = self.handles.as_ref().map(HandleSet::root) else {
            return Ok(());
        };
        let sub_element = self.binding.as_ref().is_some_and(SelectionBinding::is_sub_element);

        if !self.visible || sub_element {
            if !self.visible {
                scene.attach_overlay(root)?;
                debug!("view {:?}: gizmo attached", self.view);
            }
            self.place(scene)?;
            self.visible = true;
        }
        self.session = None;
        Ok(())
    }

    fn detach<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        self.session = None;
        if !self.visible {
            return Ok(());
        }
        self.visible = false;
        self.pre_picked = None;
        if let Some(handles) = self.handles.as_mut() {
            for handle in handles.iter_mut() {
                handle.set_highlight(scene, false)?;
            }
            scene.detach_overlay(handles.root())?;
        }
        debug!("view {:?}: gizmo detached", self.view);
        Ok(())
    }

    /// Masks handle groups according to the filters, or the section-plane layout.
    fn apply_visibilities<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        let Some(handles) = self.handles.as_mut() else {
            return Ok(());
        };
        let section = self
            .binding
            .as_ref()
            .is_some_and(|b| b.kind == ElementKind::SectionPlane);

        for handle in handles.iter_mut() {
            handle.set_enabled(scene, handle_enabled(handle.kind, section, self.filters))?;
            if matches!(handle.kind, HandleKind::Rotate(Axis::X | Axis::Y)) {
                handle.set_full(scene, section)?;
            }
        }
        Ok(())
    }

    pub fn set_filters<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, filters: DraggerFilters) -> EventResult {
        debug!("view {:?}: dragger filters {:#x}", self.view, filters.bits());
        self.filters = filters;
        if let Err(err) = self.apply_visibilities(scene) {
            warn!("view {:?}: cannot apply dragger filters: {err}", self.view);
            return EventResult::IGNORED;
        }
        EventResult::REPAINT
    }

    /// Re-places the gizmo on its element. No-op while detached.
    pub fn refresh_placement<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> EventResult {
        if !self.visible {
            return EventResult::IGNORED;
        }
        match self.place(scene) {
            Ok(()) => EventResult::REPAINT,
            Err(err) => {
                warn!("view {:?}: gizmo placement failed: {err}", self.view);
                EventResult::IGNORED
            }
        }
    }

    fn place<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> SceneResult<()> {
        let (Some(handles), Some(binding)) = (self.handles.as_ref(), self.binding.as_ref()) else {
            return Ok(());
        };
        let camera = *scene.camera().ok_or(SceneError::NoCamera)?;

        let pivot = element_pivot(scene, binding)?;
        let view_pivot = camera.world_to_view(pivot);
        let scale = gizmo_scale_factor(-view_pivot.z, &self.settings);
        let orientation = camera.world_to_view_rotation() * world_orientation(scene, binding.node)?;

        let root = handles.root();
        scene.set_local_transform(
            root,
            NodeTransform {
                translation: view_pivot,
                orientation: orientation.normalize(),
                scale: Vector3::new(scale, scale, scale),
            },
        )?;
        self.gizmo_scale = scale;
        trace!("view {:?}: gizmo at {view_pivot:?} scale {scale}", self.view);
        Ok(())
    }

    /// Whether `handle` can be hovered and armed under the current binding
    /// and filters.
    pub fn is_handle_enabled(&self, handle: HandleId) -> bool {
        let section = self
            .binding
            .as_ref()
            .is_some_and(|b| b.kind == ElementKind::SectionPlane);
        handle_enabled(handle.kind(), section, self.filters)
    }

    /// Hover highlight. Ignored while a drag is in progress or on a masked handle.
    pub fn on_pre_pick<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, handle: HandleId) -> EventResult {
        if !self.visible || self.is_dragging() || !self.is_handle_enabled(handle) {
            return EventResult::IGNORED;
        }
        if self.pre_picked == Some(handle) {
            return EventResult::HANDLED;
        }
        match self.highlight(scene, handle) {
            Ok(()) => EventResult::REPAINT,
            Err(err) => {
                warn!("view {:?}: pre-pick failed: {err}", self.view);
                EventResult::IGNORED
            }
        }
    }

    fn highlight<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, handle: HandleId) -> SceneResult<()> {
        let Some(handles) = self.handles.as_mut() else {
            return Ok(());
        };
        if let Some(previous) = self.pre_picked.take() {
            handles.get_mut(previous).set_highlight(scene, false)?;
        }
        handles.get_mut(handle).set_highlight(scene, true)?;
        self.pre_picked = Some(handle);
        Ok(())
    }

    /// Clears the hover highlight.
    pub fn on_un_pre_pick<S: SceneAccess + ?Sized>(&mut self, scene: &mut S) -> EventResult {
        let (Some(previous), Some(handles)) = (self.pre_picked, self.handles.as_mut()) else {
            return EventResult::HANDLED;
        };
        self.pre_picked = None;
        match handles.get_mut(previous).set_highlight(scene, false) {
            Ok(()) => EventResult::REPAINT,
            Err(err) => {
                warn!("view {:?}: un-pre-pick failed: {err}", self.view);
                EventResult::IGNORED
            }
        }
    }

    /// Arms `handle`, or disarms it when it is the handle already armed.
    /// Masked handles are never armed.
    pub fn on_pick(&mut self, handle: HandleId) -> EventResult {
        if !self.visible {
            return EventResult::IGNORED;
        }
        if !self.is_handle_enabled(handle) {
            debug!("view {:?}: {:?} is masked, pick ignored", self.view, handle.kind());
            return EventResult::IGNORED;
        }
        let Some(target) = self.binding.as_ref().map(|b| b.node) else {
            return EventResult::IGNORED;
        };

        if self.last_picked == Some(handle) && self.session.is_some() {
            self.session = None;
            debug!("view {:?}: {:?} disarmed", self.view, handle.kind());
        } else {
            self.session = Some(DragSession::new(handle, target));
            self.last_picked = Some(handle);
            debug!("view {:?}: {:?} armed", self.view, handle.kind());
        }
        EventResult::HANDLED
    }

    /// Ends the drag.
    pub fn on_left_up(&mut self) -> EventResult {
        match self.session.take() {
            Some(session) => {
                debug!("view {:?}: {:?} released", self.view, session.handle.kind());
                EventResult::HANDLED
            }
            None => EventResult::IGNORED,
        }
    }

    /// Applies one cursor move to the armed handle's element.
    ///
    /// The first move after arming only records the baseline. Moving without
    /// the left button once the baseline exists disarms.
    pub fn on_mouse_move<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        x: i32,
        y: i32,
        flags: ModifierFlags,
    ) -> EventResult {
        let Some(mut session) = self.session else {
            return EventResult::IGNORED;
        };
        if !session.first_move && !flags.left_button() {
            debug!("view {:?}: button released outside, disarmed", self.view);
            self.session = None;
            return EventResult::IGNORED;
        }
        if self.binding.as_ref().map(|b| b.node) != Some(session.target) {
            debug!("view {:?}: drag target changed, session dropped", self.view);
            self.session = None;
            return EventResult::IGNORED;
        }

        if session.first_move {
            session.first_move = false;
            session.last_cursor = (x, y);
            self.session = Some(session);
            return EventResult::HANDLED;
        }

        let dx = (x - session.last_cursor.0) as f32;
        let dy = (y - session.last_cursor.1) as f32;
        if dx == 0.0 && dy == 0.0 {
            return EventResult::HANDLED;
        }

        let step = self.drag_step(&*scene, &session, dx, dy, (x, y));
        session.last_cursor = (x, y);
        self.session = Some(session);

        match step {
            Ok(Some(transform)) => match self.commit(scene, session.target, transform) {
                Ok(()) => EventResult::REPAINT,
                Err(err) => self.abandon(err),
            },
            Ok(None) => EventResult::HANDLED,
            Err(err) => self.abandon(err),
        }
    }

    fn abandon(&mut self, err: SceneError) -> EventResult {
        warn!("view {:?}: drag abandoned: {err}", self.view);
        self.session = None;
        EventResult::IGNORED
    }

    fn drag_step<S: SceneAccess + ?Sized>(
        &self,
        scene: &S,
        session: &DragSession,
        dx: f32,
        dy: f32,
        cursor: (i32, i32),
    ) -> SceneResult<Option<NodeTransform>> {
        let camera = scene.camera().ok_or(SceneError::NoCamera)?;
        let current = scene.local_transform(session.target)?;
        let kind = session.handle.kind();
        trace!("view {:?}: {kind:?} d=({dx}, {dy})", self.view);

        let next = match kind {
            HandleKind::Translate(axis) => {
                let orientation = world_orientation(scene, session.target)?;
                let axis_camera = axis_in_camera(camera.orientation, orientation, axis);
                let delta = translate_delta(dx, dy, axis_camera, self.gizmo_scale);
                Some(translate_along_local_axis(&current, axis, delta))
            }
            HandleKind::Rotate(axis) => {
                let orientation = world_orientation(scene, session.target)?;
                let axis_camera = axis_in_camera(camera.orientation, orientation, axis);
                let prev = (session.last_cursor.0 as f32, session.last_cursor.1 as f32);
                let curr = (cursor.0 as f32, cursor.1 as f32);
                let angle = rotation_angle(
                    prev,
                    curr,
                    camera.viewport_size(),
                    axis,
                    axis_camera,
                    self.settings.rotation_gain,
                );
                Some(rotate_about_local_axis(&current, axis, angle))
            }
            HandleKind::UniformScale => scale_step(
                &current,
                dx,
                dy,
                self.gizmo_scale,
                self.settings.scale_sensitivity,
                self.settings.min_object_scale,
            ),
        };
        Ok(next)
    }

    fn commit<S: SceneAccess + ?Sized>(
        &mut self,
        scene: &mut S,
        target: NodeId,
        transform: NodeTransform,
    ) -> SceneResult<()> {
        scene.set_local_transform(target, transform)?;
        self.place(scene)?;
        if let Some(binding) = self.binding.as_ref() {
            self.notifications.push(Notification::ElementMoved {
                view: self.view,
                element_id: binding.element_id,
                doc_id: binding.doc_id,
            });
        }
        Ok(())
    }

    /// Hit-tests the visible handles under the cursor.
    pub fn pick_handle_at<S: SceneAccess + ?Sized>(&self, scene: &S, x: i32, y: i32) -> Option<HandleId> {
        if !self.visible {
            return None;
        }
        let handles = self.handles.as_ref()?;
        let camera = scene.camera()?;
        let ray = screen_to_view_ray(camera, x as f32, y as f32);

        let picked = pick_nodes(scene, handles.iter().map(|h| h.node), &ray)
            .and_then(|hit| match hit {
                Some(hit) => handles.handle_for_node(scene, hit.node),
                None => Ok(None),
            });
        match picked {
            Ok(handle) => handle,
            Err(err) => {
                warn!("view {:?}: handle pick failed: {err}", self.view);
                None
            }
        }
    }

    /// Routes a raw mouse event.
    ///
    /// A left press on a handle arms it and records the press point as the
    /// drag baseline. A press on the handle a `ViewPick` just armed only
    /// records the baseline. Plain moves update the hover highlight without
    /// consuming the event.
    pub fn handle_mouse<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, event: &MouseEvent) -> EventResult {
        match event.action {
            MouseAction::LeftDown => {
                let Some(handle) = self.pick_handle_at(&*scene, event.x, event.y) else {
                    return EventResult::IGNORED;
                };
                let pending = self
                    .session
                    .is_some_and(|session| session.handle == handle && session.first_move);
                let picked = if pending {
                    EventResult::HANDLED
                } else {
                    self.on_pick(handle)
                };
                if self.session.is_some() {
                    let flags = event.flags | ModifierFlags::LBUTTON;
                    self.on_mouse_move(scene, event.x, event.y, flags);
                }
                picked
            }
            MouseAction::LeftUp => self.on_left_up(),
            MouseAction::Move => {
                let result = self.on_mouse_move(scene, event.x, event.y, event.flags);
                if result.handled || self.session.is_some() {
                    return result;
                }
                let hover = match self.pick_handle_at(&*scene, event.x, event.y) {
                    Some(handle) => self.on_pre_pick(scene, handle),
                    None => self.on_un_pre_pick(scene),
                };
                EventResult::IGNORED.with_repaint(hover.requires_repaint)
            }
            MouseAction::MiddleDown | MouseAction::MiddleUp | MouseAction::Wheel(_) => EventResult::IGNORED,
        }
    }

    /// Handles a non-mouse view message.
    pub fn handle_message<S: SceneAccess + ?Sized>(&mut self, scene: &mut S, message: &ViewMessage) -> EventResult {
        match message {
            ViewMessage::SetViewParam(ViewParam::DraggerFilters(filters)) => self.set_filters(scene, *filters),
            ViewMessage::SetViewParam(ViewParam::ManipulationMode(_)) => EventResult::IGNORED,
            ViewMessage::HighlightElement(binding) => self.on_selection_changed(scene, binding.clone()),
            ViewMessage::UnHighlightElement { node } => self.on_selection_lost(scene, *node),
            ViewMessage::PreHighlightChanged => {
                if self.visible && !self.is_dragging() {
                    self.on_un_pre_pick(scene)
                } else {
                    EventResult::IGNORED
                }
            }
            ViewMessage::ViewPick { handle, pre_pick } => {
                let Some(handle) = HandleId::new(*handle) else {
                    warn!("view {:?}: pick of unknown handle {handle}", self.view);
                    return EventResult::IGNORED;
                };
                if *pre_pick {
                    self.on_pre_pick(scene, handle)
                } else {
                    self.on_pick(handle)
                }
            }
            ViewMessage::CameraChanged => {
                if self.visible {
                    self.refresh_placement(scene);
                }
                EventResult::HANDLED
            }
            ViewMessage::ElementMoved => self.refresh_placement(scene),
        }
    }
}

/// Section planes mask translation and the Z ring and ignore filters.
fn handle_enabled(kind: HandleKind, section: bool, filters: DraggerFilters) -> bool {
    if section {
        !matches!(kind, HandleKind::Translate(_) | HandleKind::Rotate(Axis::Z))
    } else {
        filters.allows(kind)
    }
}

/// World orientation of `node`, composed up its ancestor chain.
fn world_orientation<S: SceneAccess + ?Sized>(scene: &S, node: NodeId) -> SceneResult<Quaternion<f32>> {
    let mut orientation = scene.local_transform(node)?.orientation;
    let mut current = scene.parent(node)?;
    while let Some(parent) = current {
        orientation = scene.local_transform(parent)?.orientation * orientation;
        current = scene.parent(parent)?;
    }
    Ok(orientation.normalize())
}

/// Center of the element in world space.
///
/// For sub-element selections this is the center of the clicked part;
/// otherwise the center of the element's whole subtree, falling back to its
/// origin when it has no geometry.
fn element_pivot<S: SceneAccess + ?Sized>(scene: &S, binding: &SelectionBinding) -> SceneResult<Vector3<f32>> {
    let node = binding.sub_node.unwrap_or(binding.node);
    let parent_world = match scene.parent(node)? {
        Some(parent) => scene.world_matrix(parent)?,
        None => Matrix4::identity(),
    };
    let local_center = match scene.bounding_box(node)? {
        Some(bounds) => bounds.center(),
        None => scene.local_transform(node)?.translation,
    };
    let world = parent_world * local_center.extend(1.0);
    Ok(world.truncate() / world.w)
}
